//! Configuration validation.
//!
//! Semantic checks only; serde handles syntax. All errors are collected so a
//! bad file is fixed in one pass.

use std::net::SocketAddr;

use crate::config::schema::RelayConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("{:?} is not a socket address", config.listener.bind_address),
        ));
    }

    let param = &config.relay.destination_param;
    if param.is_empty() {
        errors.push(ValidationError::new("relay.destination_param", "must not be empty"));
    } else if urlencoding::encode(param) != param.as_str() {
        errors.push(ValidationError::new(
            "relay.destination_param",
            format!("{:?} must not need URL encoding", param),
        ));
    }

    if config.relay.connect_timeout_secs == 0 {
        errors.push(ValidationError::new("relay.connect_timeout_secs", "must be greater than 0"));
    }

    if config.relay.max_body_bytes == 0 {
        errors.push(ValidationError::new("relay.max_body_bytes", "must be greater than 0"));
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level {:?}", config.observability.log_level),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("{:?} is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&RelayConfig::default()), Ok(()));
    }

    #[test]
    fn destination_param_must_be_url_safe() {
        let mut config = RelayConfig::default();
        config.relay.destination_param = "dest url".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "relay.destination_param");
    }

    #[test]
    fn metrics_address_checked_only_when_enabled() {
        let mut config = RelayConfig::default();
        config.observability.metrics_address = "bogus".to_string();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn unknown_log_level() {
        let mut config = RelayConfig::default();
        config.observability.log_level = "loud".to_string();
        assert!(validate_config(&config).is_err());
    }
}
