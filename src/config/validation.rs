//! Listener-level configuration checks.
//!
//! Route invariants are enforced by the route table builder; this module
//! only covers what the listener and observability layers need.

use std::net::SocketAddr;

use crate::config::schema::ServerConfig;
use crate::error::ConfigError;

/// Lowest port the server agrees to bind.
pub const MIN_PORT: u16 = 1024;

pub fn validate_listener(config: &ServerConfig) -> Result<(), ConfigError> {
    if config.listener.host.trim().is_empty() {
        return Err(ConfigError::EmptyHost);
    }
    if config.listener.port < MIN_PORT {
        return Err(ConfigError::PortOutOfRange(config.listener.port));
    }
    if let Some(addr) = &config.observability.metrics_address {
        addr.parse::<SocketAddr>()
            .map_err(|_| ConfigError::MetricsAddress(addr.clone()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(validate_listener(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn test_privileged_port_rejected() {
        let mut config = ServerConfig::default();
        config.listener.port = 80;
        assert!(matches!(
            validate_listener(&config),
            Err(ConfigError::PortOutOfRange(80))
        ));
    }

    #[test]
    fn test_empty_host_rejected() {
        let mut config = ServerConfig::default();
        config.listener.host = " ".into();
        assert!(matches!(validate_listener(&config), Err(ConfigError::EmptyHost)));
    }

    #[test]
    fn test_bad_metrics_address_rejected() {
        let mut config = ServerConfig::default();
        config.observability.metrics_address = Some("not-an-addr".into());
        assert!(matches!(
            validate_listener(&config),
            Err(ConfigError::MetricsAddress(_))
        ));
    }
}
