// ABOUTME: SMPP client module providing the transport the gateway's session manager drives
// ABOUTME: Exports the client trait, the tokio-backed default client, events, errors and keep-alive

//! SMPP Client Module
//!
//! * **Native async traits** - `SmppClient` returns `Send` futures without `async_trait`
//! * **One I/O task per connection** - requests are correlated with responses by
//!   sequence number, so clones of a client can be used concurrently
//! * **Keep-alive** - enquire_link is sent on an interval and a dead link is closed
//! * **Events** - everything the SMSC does on its own arrives as a [`SessionEvent`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use smpp_gateway::client::{
//!     BindCredentials, DefaultClient, KeepAliveConfig, SessionEvent, SmppClient, SmsMessage,
//! };
//! use smpp_gateway::datatypes::DataCoding;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (client, mut events) =
//!     DefaultClient::connect("localhost:2775", KeepAliveConfig::default()).await?;
//!
//! let response = client
//!     .bind(&BindCredentials::transmitter("system_id", "password"))
//!     .await?;
//! assert_eq!(response.command_status, 0);
//!
//! let sms = SmsMessage::new("0987654321", "system_id", "Hello!")
//!     .with_data_coding(DataCoding::Ucs2);
//! let response = client.submit_sm(sms.to_submit_sm()?).await?;
//! println!("Message sent with ID: {}", response.message_id);
//!
//! client.unbind().await?;
//! client.close();
//! while let Some(event) = events.recv().await {
//!     if let SessionEvent::Close = event {
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod default;
pub mod error;
pub mod keepalive;
pub mod traits;
pub mod types;

// Re-export the main types for easy access
pub use default::DefaultClient;
pub use error::{SmppError, SmppResult};
pub use keepalive::{KeepAliveAction, KeepAliveConfig, KeepAliveManager, KeepAliveStatus};
pub use traits::{SessionEvent, SessionEvents, SmppClient};
pub use types::{BindCredentials, BindType, SmsMessage};
