//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router for the configured role
//! - Wire up middleware (request ID, tracing, timeout, auth, metrics)
//! - Answer questions from the catalog (responders)
//! - Dispatch and forward questions (orchestrator)
//! - Apply configuration reloads without dropping in-flight requests

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::{rejection::JsonRejection, DefaultBodyLimit, MatchedPath, State},
    http::{HeaderMap, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::catalog::Catalog;
use crate::config::schema::{AgentConfig, Role, ServiceKind};
use crate::http::openapi;
use crate::http::request::{
    propagate_request_id_layer, set_request_id_layer, RequestIdExt,
};
use crate::http::response::ApiError;
use crate::observability::metrics;
use crate::orchestrator::{Forwarder, Orchestrator};
use crate::security::bearer_auth;

/// `{"pregunta": ...}` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pregunta {
    pub pregunta: String,
}

/// `{"respuesta": ...}` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Respuesta {
    pub respuesta: String,
}

/// `POST /token` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// What a role does with a question.
#[derive(Debug)]
pub enum RoleHandler {
    Responder {
        kind: ServiceKind,
        catalog: Catalog,
    },
    Orchestrator {
        orchestrator: Orchestrator,
        forwarder: Forwarder,
    },
}

/// Compiled, immutable view of one configuration.
#[derive(Debug)]
pub struct ServiceState {
    pub role: Role,
    pub config: AgentConfig,
    pub handler: RoleHandler,
}

impl ServiceState {
    /// Compile `config` for `role`.
    pub fn build(role: Role, config: AgentConfig) -> Self {
        let handler = match role.service() {
            Some(kind) => RoleHandler::Responder {
                kind,
                catalog: Catalog::resolve(kind, config.catalog.as_ref()),
            },
            None => RoleHandler::Orchestrator {
                forwarder: Forwarder::new(Duration::from_secs(config.timeouts.upstream_secs)),
                orchestrator: Orchestrator::new(config.clone()),
            },
        };
        Self {
            role,
            config,
            handler,
        }
    }
}

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<ArcSwap<ServiceState>>,
}

impl AppState {
    pub fn new(state: ServiceState) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(state)),
        }
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> Arc<ServiceState> {
        self.inner.load_full()
    }

    /// Swap in a new configuration.
    ///
    /// The role, request timeout, body limit and bind address are baked into
    /// the router and listener; changes to them are logged and take effect
    /// only after a restart.
    pub fn reload(&self, config: AgentConfig) {
        let current = self.current();
        let role = current.role;
        for field in restart_required(&current.config, &config) {
            tracing::warn!(
                role = %role,
                field,
                "Setting changed on reload; restart required to apply it"
            );
        }
        self.inner.store(Arc::new(ServiceState::build(role, config)));
        tracing::info!(role = %role, "Configuration reloaded");
    }
}

/// Settings in `next` that differ from `running` but cannot be applied live.
pub fn restart_required(running: &AgentConfig, next: &AgentConfig) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if running.service.role != next.service.role {
        fields.push("service.role");
    }
    if running.listener.bind_address != next.listener.bind_address {
        fields.push("listener.bind_address");
    }
    if running.listener.max_body_bytes != next.listener.max_body_bytes {
        fields.push("listener.max_body_bytes");
    }
    if running.timeouts.request_secs != next.timeouts.request_secs {
        fields.push("timeouts.request_secs");
    }
    fields
}

/// HTTP server for one service role.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a server for the role named in `config`.
    pub fn new(config: AgentConfig) -> Self {
        let role = config.service.role;
        let request_timeout = Duration::from_secs(config.timeouts.request_secs);
        let max_body = config.listener.max_body_bytes;

        let state = AppState::new(ServiceState::build(role, config));
        let router = Self::build_router(role, request_timeout, max_body, state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(
        role: Role,
        request_timeout: Duration,
        max_body: usize,
        state: AppState,
    ) -> Router {
        let routes = Router::new()
            .route("/health", get(health_handler))
            .route("/openapi.json", get(openapi_handler));

        let routes = match role {
            Role::Orchestrator => routes
                .route("/token", post(token_handler))
                .route("/consulta", post(consulta_handler)),
            _ => routes.route("/respuesta", post(respuesta_handler)),
        };

        routes
            .layer(middleware::from_fn_with_state(state.clone(), bearer_auth))
            .layer(middleware::from_fn_with_state(state.clone(), track_requests))
            .layer(DefaultBodyLimit::max(max_body))
            .layer(TimeoutLayer::new(request_timeout))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = request.request_id().unwrap_or("-"),
                )
            }))
            .layer(set_request_id_layer())
            .with_state(state)
    }

    /// The fully layered router (used by in-process tests).
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configuration updates arriving on `config_updates` are applied
    /// atomically; the server stops when `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<AgentConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let role = self.state.current().role;
        tracing::info!(address = %addr, role = %role, "HTTP server starting");

        let reload_state = self.state.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                reload_state.reload(config);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!(role = %role, "HTTP server stopped");
        Ok(())
    }
}

/// Records request count and latency.
async fn track_requests(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let started = Instant::now();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    metrics::record_request(state.current().role, &path, response.status().as_u16(), started);
    response
}

async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": state.current().role.as_str(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn openapi_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(openapi::document(state.current().role))
}

async fn token_handler(State(state): State<AppState>) -> Json<TokenResponse> {
    Json(TokenResponse {
        access_token: state.current().config.auth.token.clone(),
        token_type: "bearer".to_string(),
    })
}

/// Responder: answer from the keyword catalog.
async fn respuesta_handler(
    State(state): State<AppState>,
    payload: Result<Json<Pregunta>, JsonRejection>,
) -> Result<Json<Respuesta>, ApiError> {
    let Json(Pregunta { pregunta }) = payload?;
    let current = state.current();

    let RoleHandler::Responder { kind, catalog } = &current.handler else {
        return Err(ApiError::BadGateway);
    };

    let answer = catalog.answer(&pregunta);
    tracing::info!(
        service = %kind,
        pregunta = %pregunta,
        normalized = %answer.normalized,
        matched = answer.matched,
        "Question answered"
    );

    Ok(Json(Respuesta {
        respuesta: answer.text.to_string(),
    }))
}

/// Orchestrator: route to a responder and relay its answer.
async fn consulta_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<Pregunta>, JsonRejection>,
) -> Result<Json<Respuesta>, ApiError> {
    let Json(Pregunta { pregunta }) = payload?;
    let current = state.current();

    let RoleHandler::Orchestrator {
        orchestrator,
        forwarder,
    } = &current.handler
    else {
        return Err(ApiError::BadGateway);
    };

    tracing::info!(pregunta = %pregunta, "Question received");

    let routed = orchestrator
        .ask(forwarder, &pregunta, headers.request_id())
        .await
        .map_err(|_| ApiError::BadGateway)?;

    Ok(Json(Respuesta {
        respuesta: routed.respuesta,
    }))
}
