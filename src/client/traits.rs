// ABOUTME: Core SMPP client trait and the session events a client reports
// ABOUTME: Defines the interface the gateway drives, so sessions can be faked in tests

use crate::client::error::{SmppError, SmppResult};
use crate::client::types::BindCredentials;
use crate::datatypes::{BindResponse, SubmitSm, SubmitSmResponse};
use std::future::Future;
use tokio::sync::mpsc;

/// Core SMPP client operations
///
/// A client is a cheap, cloneable handle to one connection. Every clone talks
/// to the same connection; closing through any of them closes it for all.
/// Responses are returned with their raw `command_status`, so callers decide
/// what a non-zero status means for them.
pub trait SmppClient: Clone + Send + Sync + 'static {
    /// Send a bind request built from `credentials` and wait for the
    /// matching response.
    fn bind(
        &self,
        credentials: &BindCredentials,
    ) -> impl Future<Output = SmppResult<BindResponse>> + Send;

    /// Send a submit_sm and wait for the matching submit_sm_resp. The
    /// client assigns the sequence number.
    fn submit_sm(
        &self,
        submit: SubmitSm,
    ) -> impl Future<Output = SmppResult<SubmitSmResponse>> + Send;

    /// Terminate the SMPP session gracefully by sending an unbind PDU
    /// and waiting for the response.
    fn unbind(&self) -> impl Future<Output = SmppResult<()>> + Send;

    /// Close the connection without unbinding. Idempotent.
    fn close(&self);

    /// Returns true while the underlying TCP connection is open
    fn is_connected(&self) -> bool;
}

/// Signals a connection reports to whoever owns it.
///
/// `Close` is always the last event on a connection and is sent exactly once.
#[derive(Debug)]
pub enum SessionEvent {
    /// Transport or codec fault. The connection closes right after.
    Error(SmppError),
    /// The peer sent enquire_link; it has already been answered.
    EnquireLink { sequence_number: u32 },
    /// The peer sent a PDU the client does not handle.
    Unknown { command_id: u32, sequence_number: u32 },
    /// The peer asked to unbind; unbind_resp has been sent and the
    /// connection is closing.
    Unbind,
    /// The connection is gone.
    Close,
}

/// Receiving end of a connection's events
pub type SessionEvents = mpsc::UnboundedReceiver<SessionEvent>;
