//! Server configuration

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::hub::HubConfig;

/// Default listen port
pub const DEFAULT_PORT: u16 = 8080;

/// Server configuration options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Idle timeout (disconnect if no frame received; None = never)
    pub idle_timeout: Option<Duration>,

    /// Broadcast hub settings
    pub hub: HubConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            idle_timeout: None,
            hub: HubConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set idle timeout. Zero disables it.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// Set the broadcast interval
    pub fn interval(mut self, interval: Duration) -> Self {
        self.hub = self.hub.interval(interval);
        self
    }

    /// Replace hub settings wholesale
    pub fn hub(mut self, hub: HubConfig) -> Self {
        self.hub = hub;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();

        assert_eq!(config.bind_addr.port(), 8080);
        assert!(config.bind_addr.ip().is_unspecified());
        assert!(config.idle_timeout.is_none());
        assert_eq!(config.hub, HubConfig::default());
    }

    #[test]
    fn test_with_addr() {
        let addr: SocketAddr = "127.0.0.1:9000".parse().unwrap();
        let config = ServerConfig::with_addr(addr);

        assert_eq!(config.bind_addr, addr);
    }

    #[test]
    fn test_builder_idle_timeout() {
        let config = ServerConfig::default().idle_timeout(Duration::from_secs(5));
        assert_eq!(config.idle_timeout, Some(Duration::from_secs(5)));

        let config = config.idle_timeout(Duration::ZERO);
        assert!(config.idle_timeout.is_none());
    }

    #[test]
    fn test_builder_chaining() {
        let addr: SocketAddr = "127.0.0.1:8081".parse().unwrap();
        let config = ServerConfig::default()
            .bind(addr)
            .interval(Duration::from_millis(100))
            .idle_timeout(Duration::from_secs(30));

        assert_eq!(config.bind_addr, addr);
        assert_eq!(config.hub.interval, Duration::from_millis(100));
        assert_eq!(config.idle_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_builder_hub() {
        let hub = HubConfig::default().fanout_limit(8).seed(1);
        let config = ServerConfig::default().hub(hub.clone());

        assert_eq!(config.hub, hub);
    }
}
