// ABOUTME: Gateway core that keeps one SMPP session bound and submits messages over it
// ABOUTME: Session lifecycle, bind negotiation, single and bulk submission

//! # Gateway
//!
//! A [`SessionManager`] owns the single connection to the SMSC. It connects,
//! negotiates a bind, and reconnects after a fixed delay whenever the link
//! goes away. A [`Dispatcher`] submits messages over whatever session is
//! bound at that moment, and the bulk worker feeds it one batch at a time.

pub mod bulk;
pub mod config;
pub mod dispatcher;
pub mod lifecycle;
pub mod negotiation;

#[cfg(test)]
pub(crate) mod testing;

pub use bulk::{
    BulkError, BulkHandle, BulkRequest, BulkResult, DEFAULT_QUEUE_DEPTH, FailedMessage,
    SentMessage, spawn_bulk_worker, submit_all,
};
pub use config::SessionConfig;
pub use dispatcher::{DispatchError, Dispatcher, SubmissionRequest, SubmissionResult};
pub use lifecycle::{Connector, SessionHandle, SessionManager, SessionState, TcpConnector};
pub use negotiation::{BIND_ROTATION, BindNegotiator, MAX_BIND_FAILURES, NegotiationOutcome};
