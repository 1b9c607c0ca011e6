//! Keyword-category dispatch to a responder.

use crate::catalog::defaults;
use crate::config::schema::{DispatchConfig, ServiceKind};
use crate::matching::KeywordTable;

/// Compiled dispatch table.
#[derive(Debug)]
pub struct Dispatcher {
    table: KeywordTable<ServiceKind>,
    fallback: ServiceKind,
}

impl Dispatcher {
    pub fn from_config(config: DispatchConfig) -> Self {
        Self {
            table: KeywordTable::compile(config.normalization, config.rules),
            fallback: config.fallback,
        }
    }

    /// Dispatcher from an override, or the built-in table.
    pub fn resolve(override_config: Option<&DispatchConfig>) -> Self {
        Self::from_config(override_config.cloned().unwrap_or_else(defaults::dispatch))
    }

    /// Pick the responder for a question.
    pub fn route(&self, pregunta: &str) -> ServiceKind {
        self.table.lookup(pregunta).copied().unwrap_or(self.fallback)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::resolve(None)
    }
}
