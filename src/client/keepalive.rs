// ABOUTME: SMPP keep-alive bookkeeping for long-running client connections
// ABOUTME: Decides on each timer tick whether to send enquire_link or give up on the link

use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for SMPP keep-alive functionality
///
/// Controls the periodic enquire_link PDUs the client's I/O task sends while
/// the connection is open. An enquire_link that is still unanswered when the
/// next tick arrives counts as one failure; `max_failures` consecutive
/// failures close the connection.
///
/// # Example
///
/// ```rust
/// use smpp_gateway::client::KeepAliveConfig;
/// use std::time::Duration;
///
/// let config = KeepAliveConfig::new(Duration::from_secs(30)).with_max_failures(5);
/// assert_eq!(config.max_failures, 5);
///
/// assert!(!KeepAliveConfig::disabled().enabled);
/// ```
#[derive(Debug, Clone)]
pub struct KeepAliveConfig {
    /// Interval between enquire_link PDUs (default: 10 seconds)
    pub interval: Duration,

    /// Consecutive unanswered enquire_links before the link is dead (default: 3)
    pub max_failures: u32,

    /// Whether keep-alive is enabled (default: true)
    pub enabled: bool,
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_failures: 3,
            enabled: true,
        }
    }
}

impl KeepAliveConfig {
    /// Create a new keep-alive configuration with custom interval
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    /// Set the maximum consecutive failures before connection is considered dead
    pub fn with_max_failures(mut self, max_failures: u32) -> Self {
        self.max_failures = max_failures;
        self
    }

    /// Create a disabled keep-alive configuration
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

/// Status information about keep-alive state
#[derive(Debug, Clone, PartialEq)]
pub struct KeepAliveStatus {
    /// Whether keep-alive is currently running
    pub running: bool,

    /// Number of consecutive failures
    pub consecutive_failures: u32,

    /// Total enquire_link PDUs sent
    pub total_pings: u32,

    /// Total enquire_link_resp PDUs matched to a ping
    pub total_pongs: u32,
}

/// What the I/O task should do on a keep-alive tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepAliveAction {
    /// Send an enquire_link
    Ping,
    /// Too many unanswered pings; close the connection
    Close,
    /// Nothing to do
    Idle,
}

/// Tracks enquire_link health for one connection.
///
/// The manager owns no timer. The client's I/O task calls `on_tick` from its
/// interval, reports the sequence number of each ping it sends, and feeds
/// every enquire_link_resp to `on_pong`.
#[derive(Debug)]
pub struct KeepAliveManager {
    config: KeepAliveConfig,

    /// Sequence number of the ping still awaiting a response
    outstanding: Option<u32>,

    consecutive_failures: u32,
    total_pings: u32,
    total_pongs: u32,
}

impl KeepAliveManager {
    pub fn new(config: KeepAliveConfig) -> Self {
        Self {
            config,
            outstanding: None,
            consecutive_failures: 0,
            total_pings: 0,
            total_pongs: 0,
        }
    }

    /// Called on every interval tick.
    pub fn on_tick(&mut self) -> KeepAliveAction {
        if !self.config.enabled {
            return KeepAliveAction::Idle;
        }

        if let Some(sequence_number) = self.outstanding.take() {
            self.consecutive_failures += 1;
            warn!(
                sequence_number,
                consecutive_failures = self.consecutive_failures,
                "enquire_link went unanswered"
            );
        }

        if self.is_connection_failed() {
            KeepAliveAction::Close
        } else {
            KeepAliveAction::Ping
        }
    }

    /// Record that an enquire_link was written with `sequence_number`
    pub fn on_ping_sent(&mut self, sequence_number: u32) {
        self.outstanding = Some(sequence_number);
        self.total_pings += 1;
        debug!(sequence_number, total = self.total_pings, "enquire_link sent");
    }

    /// Record an enquire_link_resp. Responses that do not match the
    /// outstanding ping are ignored.
    pub fn on_pong(&mut self, sequence_number: u32) {
        if self.outstanding == Some(sequence_number) {
            self.outstanding = None;
            self.consecutive_failures = 0;
            self.total_pongs += 1;
        }
    }

    /// Returns true once `max_failures` consecutive pings went unanswered
    pub fn is_connection_failed(&self) -> bool {
        self.consecutive_failures >= self.config.max_failures
    }

    pub fn status(&self) -> KeepAliveStatus {
        KeepAliveStatus {
            running: self.config.enabled,
            consecutive_failures: self.consecutive_failures,
            total_pings: self.total_pings,
            total_pongs: self.total_pongs,
        }
    }

    pub fn interval(&self) -> Duration {
        self.config.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keep_alive_config_defaults() {
        let config = KeepAliveConfig::default();
        assert_eq!(config.interval, Duration::from_secs(10));
        assert_eq!(config.max_failures, 3);
        assert!(config.enabled);
    }

    #[test]
    fn test_keep_alive_answered_pings_stay_healthy() {
        let mut manager = KeepAliveManager::new(KeepAliveConfig::default());

        for seq in 1..=5 {
            assert_eq!(manager.on_tick(), KeepAliveAction::Ping);
            manager.on_ping_sent(seq);
            manager.on_pong(seq);
        }

        let status = manager.status();
        assert_eq!(status.total_pings, 5);
        assert_eq!(status.total_pongs, 5);
        assert_eq!(status.consecutive_failures, 0);
    }

    #[test]
    fn test_keep_alive_closes_after_max_failures() {
        let mut manager = KeepAliveManager::new(KeepAliveConfig::default().with_max_failures(3));

        assert_eq!(manager.on_tick(), KeepAliveAction::Ping);
        manager.on_ping_sent(1);
        assert_eq!(manager.on_tick(), KeepAliveAction::Ping);
        manager.on_ping_sent(2);
        assert_eq!(manager.on_tick(), KeepAliveAction::Ping);
        manager.on_ping_sent(3);
        assert!(!manager.is_connection_failed());

        assert_eq!(manager.on_tick(), KeepAliveAction::Close);
        assert!(manager.is_connection_failed());
    }

    #[test]
    fn test_keep_alive_late_pong_is_ignored() {
        let mut manager = KeepAliveManager::new(KeepAliveConfig::default());

        manager.on_tick();
        manager.on_ping_sent(1);
        manager.on_tick();
        manager.on_ping_sent(2);

        manager.on_pong(1);
        assert_eq!(manager.status().consecutive_failures, 1);

        manager.on_pong(2);
        assert_eq!(manager.status().consecutive_failures, 0);
        assert_eq!(manager.status().total_pongs, 1);
    }

    #[test]
    fn test_keep_alive_disabled() {
        let mut manager = KeepAliveManager::new(KeepAliveConfig::disabled());
        assert!(!manager.status().running);
        assert_eq!(manager.on_tick(), KeepAliveAction::Idle);
    }
}
