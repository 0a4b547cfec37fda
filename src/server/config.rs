//! Server configuration.

use crate::gateway::DEFAULT_QUEUE_DEPTH;
use std::net::{Ipv4Addr, SocketAddr};

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// HTTP front door configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub addr: SocketAddr,
    /// Bulk batches that may wait for the worker before senders block
    pub queue_depth: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_HTTP_PORT)),
            queue_depth: DEFAULT_QUEUE_DEPTH,
        }
    }
}

impl ServerConfig {
    /// Listen on all interfaces at `port`
    pub fn with_port(mut self, port: u16) -> Self {
        self.addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
        self
    }

    /// Set address directly
    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_queue_depth(mut self, depth: usize) -> Self {
        self.queue_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_all_interfaces_on_3000() {
        let config = ServerConfig::default();
        assert_eq!(config.addr.to_string(), "0.0.0.0:3000");
        assert_eq!(config.queue_depth, DEFAULT_QUEUE_DEPTH);
    }

    #[test]
    fn with_port_keeps_wildcard_host() {
        let config = ServerConfig::default().with_port(8080);
        assert_eq!(config.addr.to_string(), "0.0.0.0:8080");
    }
}
