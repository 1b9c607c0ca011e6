//! Orchestrator subsystem.
//!
//! # Data Flow
//! ```text
//! POST /consulta {"pregunta"}
//!     → dispatch.rs (keyword category → ServiceKind)
//!     → DownstreamConfig (ServiceKind → base URL)
//!     → forward.rs (one POST <base>/respuesta with bearer token)
//!     → {"respuesta"} or ForwardError (→ 502)
//! ```
//!
//! # Design Decisions
//! - Exactly one downstream call per question, no retries
//! - Every failure mode collapses into a single 502 for the client
//! - The question is forwarded lowercased

pub mod dispatch;
pub mod forward;

use crate::config::schema::{AgentConfig, ServiceKind};
use crate::observability::metrics;

pub use dispatch::Dispatcher;
pub use forward::{ForwardError, Forwarder};

/// Successful orchestrated answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routed {
    pub target: ServiceKind,
    pub base_url: String,
    pub respuesta: String,
}

/// A failed orchestration, with the service it was meant for.
#[derive(Debug, thiserror::Error)]
#[error("{target} at {base_url}: {source}")]
pub struct RouteFailure {
    pub target: ServiceKind,
    pub base_url: String,
    #[source]
    pub source: ForwardError,
}

/// Routes questions to responders and relays their answers.
#[derive(Debug)]
pub struct Orchestrator {
    dispatcher: Dispatcher,
    config: AgentConfig,
}

impl Orchestrator {
    pub fn new(config: AgentConfig) -> Self {
        Self {
            dispatcher: Dispatcher::resolve(config.dispatch.as_ref()),
            config,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Base URL chosen for a question.
    pub fn select(&self, pregunta: &str) -> (ServiceKind, &str) {
        let target = self.dispatcher.route(pregunta);
        (target, self.config.downstream.base_url(target))
    }

    /// Route `pregunta` and forward it once.
    pub async fn ask(
        &self,
        forwarder: &Forwarder,
        pregunta: &str,
        request_id: Option<&str>,
    ) -> Result<Routed, RouteFailure> {
        let texto = pregunta.to_lowercase();
        let (target, base_url) = self.select(&texto);
        metrics::record_dispatch(target);

        tracing::info!(
            target_service = %target,
            url = %format!("{}/respuesta", base_url),
            request_id = request_id.unwrap_or("-"),
            "Forwarding question"
        );

        match forwarder
            .ask(base_url, &self.config.auth.token, &texto, request_id)
            .await
        {
            Ok(respuesta) => Ok(Routed {
                target,
                base_url: base_url.to_string(),
                respuesta,
            }),
            Err(source) => {
                tracing::error!(
                    target_service = %target,
                    url = %base_url,
                    error = %source,
                    "Error contacting downstream service"
                );
                metrics::record_upstream_error(target);
                Err(RouteFailure {
                    target,
                    base_url: base_url.to_string(),
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_uses_configured_urls() {
        let mut config = AgentConfig::default();
        config.downstream.apply_endpoint_list("http://c:1,http://a:2,http://i:3,http://x:4");
        let orchestrator = Orchestrator::new(config);

        assert_eq!(
            orchestrator.select("mi saldo"),
            (ServiceKind::Consultas, "http://c:1")
        );
        assert_eq!(
            orchestrator.select("abrir cuenta"),
            (ServiceKind::Cuentas, "http://a:2")
        );
        assert_eq!(
            orchestrator.select("mi dni"),
            (ServiceKind::Identidad, "http://i:3")
        );
        assert_eq!(
            orchestrator.select("hipoteca"),
            (ServiceKind::Ia, "http://x:4")
        );
    }
}
