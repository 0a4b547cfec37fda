//! Session configuration.

use crate::client::{BindCredentials, BindType, KeepAliveConfig};
use std::fmt;
use std::time::Duration;

/// Immutable settings for the single SMSC session. Built once at startup
/// and shared behind an `Arc`.
#[derive(Clone)]
pub struct SessionConfig {
    /// SMSC host name or address
    pub host: String,
    /// SMSC port
    pub port: u16,
    /// Identity presented when binding; also the source address of submissions
    pub system_id: String,
    /// Secret presented when binding
    pub password: String,
    /// system_type presented when binding
    pub system_type: String,
    /// Interval between enquire_link PDUs while connected
    pub keepalive_interval: Duration,
    /// Wait between a connection closing and the next connect
    pub reconnect_delay: Duration,
    /// Upper bound on a single submit_sm round trip
    pub submit_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 2775,
            system_id: String::new(),
            password: String::new(),
            system_type: String::new(),
            keepalive_interval: Duration::from_secs(10),
            reconnect_delay: Duration::from_secs(5),
            submit_timeout: Duration::from_secs(30),
        }
    }
}

impl SessionConfig {
    /// Create with SMSC address and credentials, other settings default
    pub fn new(
        host: impl Into<String>,
        port: u16,
        system_id: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            system_id: system_id.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    /// Set system_type
    pub fn with_system_type(mut self, system_type: impl Into<String>) -> Self {
        self.system_type = system_type.into();
        self
    }

    /// Set keep-alive interval
    pub fn with_keepalive_interval(mut self, interval: Duration) -> Self {
        self.keepalive_interval = interval;
        self
    }

    /// Set reconnect delay
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Set submission timeout
    pub fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = timeout;
        self
    }

    /// `host:port` for connecting
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn keep_alive(&self) -> KeepAliveConfig {
        KeepAliveConfig::new(self.keepalive_interval)
    }

    /// Credentials for a bind of the given type
    pub fn credentials(&self, bind_type: BindType) -> BindCredentials {
        BindCredentials::new(bind_type, self.system_id.as_str(), self.password.as_str())
            .with_system_type(self.system_type.as_str())
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("system_id", &self.system_id)
            .field("password_len", &self.password.len())
            .field("system_type", &self.system_type)
            .field("keepalive_interval", &self.keepalive_interval)
            .field("reconnect_delay", &self.reconnect_delay)
            .field("submit_timeout", &self.submit_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_gateway_timings() {
        let config = SessionConfig::new("smsc.example.net", 2775, "gateway", "pw");
        assert_eq!(config.address(), "smsc.example.net:2775");
        assert_eq!(config.keepalive_interval, Duration::from_secs(10));
        assert_eq!(config.reconnect_delay, Duration::from_secs(5));
        assert_eq!(config.submit_timeout, Duration::from_secs(30));
        assert_eq!(config.keep_alive().max_failures, 3);
    }

    #[test]
    fn debug_hides_password() {
        let config = SessionConfig::new("h", 1, "gateway", "hunter2");
        let printed = format!("{config:?}");
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("password_len: 7"));
    }

    #[test]
    fn credentials_carry_identity() {
        let config = SessionConfig::new("h", 1, "gateway", "pw").with_system_type("SMS");
        let credentials = config.credentials(BindType::Receiver);
        assert_eq!(credentials.bind_type, BindType::Receiver);
        assert_eq!(credentials.system_id, "gateway");
        assert_eq!(credentials.system_type.as_deref(), Some("SMS"));
    }
}
