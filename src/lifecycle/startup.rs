//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration, apply command-line overrides
//! - Initialize logging and metrics
//! - Start the config watcher when a file was given
//! - Bind the listener and serve until a termination signal

use std::path::PathBuf;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config::loader::{default_config, load_config, ConfigError};
use crate::config::schema::{AgentConfig, Role};
use crate::config::validation::validate_config;
use crate::config::watcher::ConfigWatcher;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::observability::{logging, metrics};

/// Command-line overrides.
#[derive(Debug, Clone, Default)]
pub struct StartupOptions {
    pub config_path: Option<PathBuf>,
    pub role: Option<Role>,
    pub bind: Option<String>,
    pub watch: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// Resolve the effective configuration.
pub fn resolve_config(options: &StartupOptions) -> Result<AgentConfig, ConfigError> {
    let mut config = match &options.config_path {
        Some(path) => load_config(path)?,
        None => default_config()?,
    };
    apply_overrides(&mut config, options);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn apply_overrides(config: &mut AgentConfig, options: &StartupOptions) {
    if let Some(role) = options.role {
        config.service.role = role;
    }
    if let Some(bind) = &options.bind {
        config.listener.bind_address = Some(bind.clone());
    }
}

/// Run one service until terminated.
pub async fn start(options: StartupOptions) -> Result<(), StartupError> {
    let config = resolve_config(&options)?;
    logging::init(&config.observability);

    let role = config.service.role;
    tracing::info!(
        role = %role,
        version = env!("CARGO_PKG_VERSION"),
        "banking-agent starting"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    // Keep the watcher alive for the lifetime of the server.
    let (config_tx, config_rx) = mpsc::unbounded_channel();
    let _watcher = match (&options.config_path, options.watch) {
        (Some(path), true) => {
            let (watcher, mut updates) = ConfigWatcher::new(path);
            let overrides = options.clone();
            tokio::spawn(async move {
                while let Some(mut update) = updates.recv().await {
                    apply_overrides(&mut update, &overrides);
                    if config_tx.send(update).is_err() {
                        break;
                    }
                }
            });
            match watcher.run() {
                Ok(w) => Some(w),
                Err(e) => {
                    tracing::error!(error = %e, "Config watcher disabled");
                    None
                }
            }
        }
        _ => None,
    };

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_termination();

    HttpServer::new(config)
        .run(listener, config_rx, server_shutdown)
        .await
        .map_err(StartupError::Serve)?;

    tracing::info!(role = %role, "Shutdown complete");
    Ok(())
}
