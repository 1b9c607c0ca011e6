//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) + MICROS_ENDPOINTS
//!     → loader.rs (parse, deserialize, env overrides)
//!     → validation.rs (semantic checks)
//!     → AgentConfig (validated, immutable)
//!     → compiled into ServiceState, shared via ArcSwap
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of the compiled state
//!     → in-flight requests keep the state they started with
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AgentConfig, AuthConfig, CatalogConfig, DispatchConfig, DownstreamConfig, ListenerConfig,
    LogFormat, MutationConfig, ObservabilityConfig, Role, ServiceKind, TimeoutConfig,
};
