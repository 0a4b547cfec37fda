// ABOUTME: HTTP to SMPP v3.4 gateway library built on a small async SMPP client
// ABOUTME: Wire codec, client transport, session lifecycle with bind fallback, and the HTTP front door

#[macro_use]
mod macros;

pub mod client;
pub mod codec;
pub mod connection;
pub mod datatypes;
pub mod gateway;
pub mod server;


// Re-export codec types for direct access
pub use codec::{CodecError, Decodable, Encodable, Frame, PduHeader};

// Re-export the main client API for easy access
pub use client::{
    BindCredentials, DefaultClient, SessionEvent, SmppClient, SmppError, SmppResult, SmsMessage,
};

pub use gateway::{Dispatcher, SessionConfig, SessionManager, SessionState};

/// Error returned at the edges: frame reads and the binary's `main`.
///
/// The layers in between use their own `thiserror` enums. The boxed form is
/// only where errors of several kinds meet, such as an I/O failure or a
/// malformed frame on the same socket read.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// A specialized `Result` type for the boxed [`Error`].
///
/// # Examples
///
/// Keep a session bound and send one message over it:
///
/// ```rust,no_run
/// use smpp_gateway::gateway::{
///     Dispatcher, SessionConfig, SessionManager, SessionState, SubmissionRequest, TcpConnector,
/// };
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> smpp_gateway::Result<()> {
///     let config = Arc::new(SessionConfig::new("localhost", 2775, "system_id", "password"));
///
///     let manager = SessionManager::new(config.clone(), TcpConnector);
///     let mut handle = manager.handle();
///     tokio::spawn(manager.run(async {
///         let _ = tokio::signal::ctrl_c().await;
///     }));
///
///     handle.wait_for(SessionState::Bound).await;
///
///     let dispatcher = Dispatcher::new(handle, config);
///     let result = dispatcher
///         .submit(&SubmissionRequest::new("1234567890", "Hello, World!"))
///         .await;
///     println!("{result:?}");
///
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;
