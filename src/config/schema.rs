//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for every
//! service role. All types derive Serde traits for deserialization from
//! config files, and every section has defaults so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::matching::{KeywordRule, Normalization};

/// Root configuration shared by the orchestrator and the responders.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AgentConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Which service this process runs.
    pub service: ServiceSection,

    /// Static bearer-token authentication.
    pub auth: AuthConfig,

    /// Responder base URLs used by the orchestrator.
    pub downstream: DownstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Overrides the built-in keyword catalog of a responder role.
    pub catalog: Option<CatalogConfig>,

    /// Overrides the built-in dispatch table of the orchestrator.
    pub dispatch: Option<DispatchConfig>,

    /// Mutation-testing runner settings.
    pub mutation: MutationConfig,
}

impl AgentConfig {
    /// Effective bind address: explicit setting or the role's default port.
    pub fn bind_address(&self) -> String {
        self.listener
            .bind_address
            .clone()
            .unwrap_or_else(|| format!("0.0.0.0:{}", self.service.role.default_port()))
    }
}

/// A downstream responder service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Consultas,
    Cuentas,
    Identidad,
    Ia,
}

impl ServiceKind {
    /// All responders, in `MICROS_ENDPOINTS` order.
    pub const ALL: [ServiceKind; 4] = [
        ServiceKind::Consultas,
        ServiceKind::Cuentas,
        ServiceKind::Identidad,
        ServiceKind::Ia,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Consultas => "consultas",
            ServiceKind::Cuentas => "cuentas",
            ServiceKind::Identidad => "identidad",
            ServiceKind::Ia => "ia",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "consultas" => Ok(ServiceKind::Consultas),
            "cuentas" => Ok(ServiceKind::Cuentas),
            "identidad" => Ok(ServiceKind::Identidad),
            "ia" => Ok(ServiceKind::Ia),
            other => Err(format!("unknown service '{}'", other)),
        }
    }
}

/// Role of a running process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Orchestrator,
    Consultas,
    Cuentas,
    Identidad,
    Ia,
}

impl Role {
    /// The responder this role serves, if any.
    pub fn service(&self) -> Option<ServiceKind> {
        match self {
            Role::Orchestrator => None,
            Role::Consultas => Some(ServiceKind::Consultas),
            Role::Cuentas => Some(ServiceKind::Cuentas),
            Role::Identidad => Some(ServiceKind::Identidad),
            Role::Ia => Some(ServiceKind::Ia),
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Role::Orchestrator => 8000,
            Role::Consultas => 8001,
            Role::Cuentas => 8002,
            Role::Identidad => 8003,
            Role::Ia => 8004,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Orchestrator => "orchestrator",
            Role::Consultas => "consultas",
            Role::Cuentas => "cuentas",
            Role::Identidad => "identidad",
            Role::Ia => "ia",
        }
    }
}

impl From<ServiceKind> for Role {
    fn from(kind: ServiceKind) -> Self {
        match kind {
            ServiceKind::Consultas => Role::Consultas,
            ServiceKind::Cuentas => Role::Cuentas,
            ServiceKind::Identidad => Role::Identidad,
            ServiceKind::Ia => Role::Ia,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "orchestrator" | "orquestador" => Ok(Role::Orchestrator),
            other => other
                .parse::<ServiceKind>()
                .map(Role::from)
                .map_err(|_| format!("unknown role '{}'", other)),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000"). Defaults to the role's port.
    pub bind_address: Option<String>,

    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: None,
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Service selection.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceSection {
    pub role: Role,
}

/// Static bearer-token authentication.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared secret expected as `Authorization: Bearer <token>`.
    pub token: String,

    /// Path prefixes that bypass the token check.
    pub public_paths: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            // Demo secret shared by every service.
            token: "secreto123".to_string(),
            public_paths: vec![
                "/token".to_string(),
                "/docs".to_string(),
                "/openapi.json".to_string(),
                "/health".to_string(),
            ],
        }
    }
}

/// Base URLs of the four responders.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DownstreamConfig {
    pub consultas: String,
    pub cuentas: String,
    pub identidad: String,
    pub ia: String,
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            consultas: "http://localhost:8001".to_string(),
            cuentas: "http://localhost:8002".to_string(),
            identidad: "http://localhost:8003".to_string(),
            ia: "http://localhost:8004".to_string(),
        }
    }
}

impl DownstreamConfig {
    /// Base URL for `kind`, without a trailing slash.
    pub fn base_url(&self, kind: ServiceKind) -> &str {
        let url = match kind {
            ServiceKind::Consultas => &self.consultas,
            ServiceKind::Cuentas => &self.cuentas,
            ServiceKind::Identidad => &self.identidad,
            ServiceKind::Ia => &self.ia,
        };
        url.trim_end_matches('/')
    }

    /// Apply a comma-separated endpoint list (consultas, cuentas, identidad, ia).
    ///
    /// Empty entries leave the current value untouched. Returns the number
    /// of endpoints applied.
    pub fn apply_endpoint_list(&mut self, list: &str) -> usize {
        let mut applied = 0;
        for (kind, url) in ServiceKind::ALL.iter().zip(list.split(',')) {
            let url = url.trim();
            if url.is_empty() {
                continue;
            }
            let slot = match kind {
                ServiceKind::Consultas => &mut self.consultas,
                ServiceKind::Cuentas => &mut self.cuentas,
                ServiceKind::Identidad => &mut self.identidad,
                ServiceKind::Ia => &mut self.ia,
            };
            *slot = url.to_string();
            applied += 1;
        }
        applied
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed to serve one inbound request, in seconds.
    pub request_secs: u64,

    /// Time allowed for the orchestrator's downstream call, in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            upstream_secs: 10,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Keyword catalog of a responder.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub normalization: Normalization,

    /// Ordered rules; first match wins.
    pub rules: Vec<KeywordRule<String>>,

    /// Response when no rule matches.
    pub fallback: String,
}

/// Orchestrator dispatch table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DispatchConfig {
    #[serde(default)]
    pub normalization: Normalization,

    /// Ordered rules; first match wins.
    pub rules: Vec<KeywordRule<ServiceKind>>,

    /// Target when no rule matches.
    #[serde(default = "default_dispatch_fallback")]
    pub fallback: ServiceKind,
}

fn default_dispatch_fallback() -> ServiceKind {
    ServiceKind::Ia
}

/// Mutation-testing runner settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Mutation tool executable.
    pub executable: String,

    /// Tool configuration file passed to `init` and `exec`.
    pub config_file: String,

    /// Session database created by `init`.
    pub session_file: String,

    /// File receiving the `dump` output.
    pub dump_file: String,

    /// Run the `baseline` step before `exec`.
    pub baseline: bool,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            executable: "cosmic-ray".to_string(),
            config_file: "cosmic-ray.toml".to_string(),
            session_file: "session.sqlite".to_string(),
            dump_file: "mutation-dump.json".to_string(),
            baseline: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: AgentConfig = toml::from_str("").unwrap();
        assert_eq!(config.service.role, Role::Orchestrator);
        assert_eq!(config.auth.token, "secreto123");
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert!(config.catalog.is_none());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("IA".parse::<Role>().unwrap(), Role::Ia);
        assert_eq!("orquestador".parse::<Role>().unwrap(), Role::Orchestrator);
        assert!("bank".parse::<Role>().is_err());
        assert_eq!(Role::Cuentas.service(), Some(ServiceKind::Cuentas));
    }

    #[test]
    fn test_endpoint_list_override() {
        let mut downstream = DownstreamConfig::default();
        let applied = downstream.apply_endpoint_list("http://a:1, ,http://c:3/");
        assert_eq!(applied, 2);
        assert_eq!(downstream.base_url(ServiceKind::Consultas), "http://a:1");
        assert_eq!(downstream.base_url(ServiceKind::Cuentas), "http://localhost:8002");
        assert_eq!(downstream.base_url(ServiceKind::Identidad), "http://c:3");
    }

    #[test]
    fn test_catalog_section() {
        let config: AgentConfig = toml::from_str(
            r#"
            [service]
            role = "ia"

            [catalog]
            normalization = "fold"
            fallback = "no se"

            [[catalog.rules]]
            any_of = ["hipoteca"]
            response = "3%"
            "#,
        )
        .unwrap();
        let catalog = config.catalog.as_ref().unwrap();
        assert_eq!(catalog.normalization, Normalization::Fold);
        assert_eq!(catalog.rules[0].value, "3%");
        assert_eq!(config.bind_address(), "0.0.0.0:8004");
    }
}
