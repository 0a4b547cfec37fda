//! Shared handler state.

use crate::gateway::{BulkHandle, SessionState};
use tokio::sync::watch;

/// Application state shared across handlers
#[derive(Debug, Clone)]
pub struct AppState {
    /// Queue into the bulk worker
    pub bulk: BulkHandle,
    /// Lifecycle state of the SMSC session
    pub session: watch::Receiver<SessionState>,
}

impl AppState {
    pub fn new(bulk: BulkHandle, session: watch::Receiver<SessionState>) -> Self {
        Self { bulk, session }
    }

    pub fn session_state(&self) -> SessionState {
        *self.session.borrow()
    }
}
