//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::relay::translator::DEFAULT_DESTINATION_PARAM;

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Forwarding behaviour.
    pub relay: ForwardingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Forwarding configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardingConfig {
    /// Query/form parameter carrying the destination URL.
    pub destination_param: String,

    /// Outbound connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Largest inbound body accepted, in bytes.
    pub max_body_bytes: usize,

    /// User-Agent sent when the caller supplied none. Empty disables it.
    pub user_agent: String,

    /// Honor HTTP_PROXY/HTTPS_PROXY/NO_PROXY for outbound calls.
    pub system_proxy: bool,
}

impl ForwardingConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            destination_param: DEFAULT_DESTINATION_PARAM.to_string(),
            connect_timeout_secs: 120,
            max_body_bytes: 10 * 1024 * 1024,
            user_agent: String::new(),
            system_proxy: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: RelayConfig = toml::from_str(
            r#"
            [relay]
            destination_param = "url"
            "#,
        )
        .unwrap();

        assert_eq!(config.relay.destination_param, "url");
        assert_eq!(config.relay.connect_timeout_secs, 120);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn default_connect_timeout() {
        assert_eq!(
            ForwardingConfig::default().connect_timeout(),
            Duration::from_secs(120)
        );
    }
}
