//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::AgentConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable carrying comma-separated responder base URLs.
pub const MICROS_ENDPOINTS_ENV: &str = "MICROS_ENDPOINTS";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AgentConfig, ConfigError> {
    let mut config: AgentConfig = toml::from_str(content)?;
    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AgentConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Defaults plus environment overrides, validated.
pub fn default_config() -> Result<AgentConfig, ConfigError> {
    parse_config("")
}

/// Apply `MICROS_ENDPOINTS` on top of the file's `[downstream]` section.
pub fn apply_env_overrides(config: &mut AgentConfig) {
    if let Ok(list) = std::env::var(MICROS_ENDPOINTS_ENV) {
        let applied = config.downstream.apply_endpoint_list(&list);
        if applied > 0 {
            tracing::debug!(applied, "Downstream endpoints taken from {}", MICROS_ENDPOINTS_ENV);
        }
    }
}
