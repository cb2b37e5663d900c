//! Startup orchestration.
//!
//! Config is loaded and validated first, then logging and metrics, then the
//! listener is bound. Any failure before serving is fatal.

use std::net::SocketAddr;
use std::path::Path;

use tokio::net::TcpListener;

use crate::config::{load_config, ConfigError, RelayConfig};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::{logging, metrics};
use crate::relay::ClientError;

/// Error raised before the server starts serving.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("outbound client: {0}")]
    Client(#[from] ClientError),
    #[error("listener: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolve configuration: file if given, defaults otherwise, then overrides.
pub fn resolve_config(
    path: Option<&Path>,
    bind_override: Option<String>,
) -> Result<RelayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };
    if let Some(bind) = bind_override {
        config.listener.bind_address = bind;
    }
    crate::config::validation::validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Start every subsystem and serve until a termination signal.
pub async fn run(config: RelayConfig) -> Result<(), StartupError> {
    logging::init_logging(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        destination_param = %config.relay.destination_param,
        connect_timeout_secs = config.relay.connect_timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = HttpServer::new(config.clone())?;
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown);

    server.run(listener, shutdown_rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_override_applies_to_defaults() {
        let config = resolve_config(None, Some("127.0.0.1:9999".to_string())).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9999");
    }

    #[test]
    fn invalid_override_is_rejected() {
        assert!(matches!(
            resolve_config(None, Some("not-an-address".to_string())),
            Err(ConfigError::Validation(_))
        ));
    }
}
