//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check downstream URLs are absolute `http` URLs (the forwarding client has no TLS)
//! - Keep the downstream deadline inside the request deadline
//! - Reject keyword rules that would match everything
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AgentConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::{AgentConfig, ServiceKind};
use crate::matching::KeywordRule;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &AgentConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.bind_address().parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.bind_address()),
        ));
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::new("listener.max_body_bytes", "must be > 0"));
    }

    if config.auth.token.trim().is_empty() {
        errors.push(ValidationError::new("auth.token", "must not be empty"));
    }
    for path in &config.auth.public_paths {
        if !path.starts_with('/') {
            errors.push(ValidationError::new(
                "auth.public_paths",
                format!("'{}' must start with '/'", path),
            ));
        }
    }

    for kind in ServiceKind::ALL {
        let raw = config.downstream.base_url(kind);
        match Url::parse(raw) {
            Ok(url) if url.scheme() == "http" => {}
            Ok(url) => errors.push(ValidationError::new(
                format!("downstream.{}", kind),
                format!("unsupported scheme '{}'", url.scheme()),
            )),
            Err(e) => errors.push(ValidationError::new(
                format!("downstream.{}", kind),
                format!("'{}' is not a URL: {}", raw, e),
            )),
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::new("timeouts.upstream_secs", "must be > 0"));
    }
    // A downstream timeout must surface as 502 before the request timeout fires.
    if config.timeouts.request_secs > 0
        && config.timeouts.upstream_secs >= config.timeouts.request_secs
    {
        errors.push(ValidationError::new(
            "timeouts.upstream_secs",
            format!(
                "must be less than timeouts.request_secs ({})",
                config.timeouts.request_secs
            ),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "is not a socket address",
        ));
    }

    if let Some(catalog) = &config.catalog {
        check_rules("catalog", &catalog.rules, &mut errors);
        if catalog.fallback.trim().is_empty() {
            errors.push(ValidationError::new("catalog.fallback", "must not be empty"));
        }
    }

    if let Some(dispatch) = &config.dispatch {
        check_rules("dispatch", &dispatch.rules, &mut errors);
    }

    if config.mutation.executable.trim().is_empty() {
        errors.push(ValidationError::new("mutation.executable", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Rules with no keywords, or with a blank keyword, match every question.
fn check_rules<T>(section: &str, rules: &[KeywordRule<T>], errors: &mut Vec<ValidationError>) {
    for (i, rule) in rules.iter().enumerate() {
        let field = format!("{}.rules[{}]", section, i);
        if rule.is_empty() {
            errors.push(ValidationError::new(field, "needs at least one keyword"));
            continue;
        }
        let blank = rule
            .any_of
            .iter()
            .chain(&rule.all_of)
            .filter(|keyword| keyword.trim().is_empty())
            .count();
        if blank > 0 {
            errors.push(ValidationError::new(
                field,
                format!("has {} blank keyword(s)", blank),
            ));
        }
    }
}
