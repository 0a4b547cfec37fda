// ABOUTME: HTTP front door for the gateway
// ABOUTME: Router, handlers, shared state, server configuration and the startup address guess

//! Gateway HTTP server.
//!
//! - `POST /send-sms` submits one message to one or more phones
//! - `GET /health` reports the SMSC session state
//!
//! # Example
//!
//! ```rust,ignore
//! use smpp_gateway::server::{AppState, ServerConfig, create_router};
//!
//! let config = ServerConfig::default().with_port(8080);
//! let app = create_router(AppState::new(bulk, handle.watch_state()));
//! let listener = tokio::net::TcpListener::bind(config.addr).await?;
//! axum::serve(listener, app).await?;
//! ```

mod address;
mod config;
mod handlers;
mod state;

pub use address::{guess_public_ipv4, is_public_ipv4};
pub use config::{DEFAULT_HTTP_PORT, ServerConfig};
pub use handlers::{ApiError, HealthResponse, Phones, SendSmsRequest, create_router, health_check};
pub use state::AppState;
