//! Bind negotiation with fallback across bind types.
//!
//! Some SMSCs accept only one kind of bind for a given account. The
//! negotiator walks a fixed rotation of bind types, giving each a bounded
//! number of consecutive rejections before moving on, and wraps around
//! after the last one.

use crate::client::{BindType, SmppClient, SmppError};
use crate::datatypes::{BindResponse, describe_status};
use crate::gateway::SessionConfig;
use tracing::{info, warn};

/// Bind types in the order they are tried
pub const BIND_ROTATION: [BindType; 3] = [
    BindType::Transmitter,
    BindType::Receiver,
    BindType::Transceiver,
];

/// Consecutive rejections of one bind type before moving to the next
pub const MAX_BIND_FAILURES: u32 = 3;

/// Result of one bind attempt
#[derive(Debug)]
pub enum NegotiationOutcome {
    /// The SMSC accepted the bind
    Bound(BindResponse),
    /// The SMSC answered with a non-zero status; the connection was closed
    Rejected { bind_type: BindType, status: u32 },
    /// No usable answer (connection lost, malformed reply); counters untouched
    Failed(SmppError),
}

/// Rotation index and per-type failure counter.
///
/// Owned by one `SessionManager`; nothing here is global.
#[derive(Debug, Clone)]
pub struct BindNegotiator {
    index: usize,
    failures: u32,
    max_failures: u32,
}

impl Default for BindNegotiator {
    fn default() -> Self {
        Self::new()
    }
}

impl BindNegotiator {
    pub fn new() -> Self {
        Self {
            index: 0,
            failures: 0,
            max_failures: MAX_BIND_FAILURES,
        }
    }

    /// The bind type the next attempt will use
    pub fn current(&self) -> BindType {
        BIND_ROTATION[self.index]
    }

    /// Consecutive rejections of the current bind type
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// A bind was accepted: start over from the first bind type.
    pub fn on_success(&mut self) {
        self.index = 0;
        self.failures = 0;
    }

    /// A bind was rejected. Returns true if this moved the rotation on.
    pub fn on_failure(&mut self) -> bool {
        self.failures += 1;
        if self.failures < self.max_failures {
            return false;
        }

        self.failures = 0;
        self.index = (self.index + 1) % BIND_ROTATION.len();
        true
    }

    /// Bind `client` with the current bind type.
    ///
    /// A rejection closes the connection, so the retry always happens on a
    /// fresh connection through the reconnect path.
    pub async fn attempt<C: SmppClient>(
        &mut self,
        client: &C,
        config: &SessionConfig,
    ) -> NegotiationOutcome {
        let bind_type = self.current();
        info!(
            %bind_type,
            system_id = %config.system_id,
            password_len = config.password.len(),
            attempt = self.failures + 1,
            "sending bind"
        );

        let status = match client.bind(&config.credentials(bind_type)).await {
            Ok(response) if response.command_status == 0 => {
                info!(
                    %bind_type,
                    status = %describe_status(0),
                    smsc = %response.system_id,
                    "bind accepted"
                );
                self.on_success();
                return NegotiationOutcome::Bound(response);
            }
            Ok(response) => response.command_status,
            Err(SmppError::Protocol(status)) => status,
            Err(e) => {
                warn!(%bind_type, error = %e, "bind got no usable response");
                client.close();
                return NegotiationOutcome::Failed(e);
            }
        };

        warn!(
            %bind_type,
            code = status,
            status = %describe_status(status),
            "bind rejected"
        );
        if self.on_failure() {
            info!(
                from = %bind_type,
                to = %self.current(),
                "bind type failed {} times, switching",
                self.max_failures
            );
        }
        client.close();

        NegotiationOutcome::Rejected { bind_type, status }
    }
}
