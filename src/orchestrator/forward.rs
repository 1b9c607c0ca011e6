//! Downstream HTTP call.
//!
//! # Responsibilities
//! - Build `POST <base>/respuesta` with bearer token and request ID
//! - Enforce the upstream deadline over connect, send and body read
//! - Decode `{"respuesta"}`, substituting a default when absent
//!
//! # Design Decisions
//! - Non-2xx downstream statuses are failures (no pass-through)
//! - Body size is capped to protect the orchestrator

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode, Uri};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde::{Deserialize, Serialize};

use crate::http::request::X_REQUEST_ID;

/// Answer used when the downstream body has no `respuesta` field.
pub const MISSING_ANSWER: &str = "Sin respuesta";

const MAX_DOWNSTREAM_BODY: usize = 1024 * 1024;

/// Why a downstream call failed.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("invalid downstream URI '{0}'")]
    InvalidUri(String),
    #[error("failed to build request: {0}")]
    Request(#[from] axum::http::Error),
    #[error("transport error: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("downstream returned {0}")]
    Status(StatusCode),
    #[error("failed to read body: {0}")]
    Body(#[from] axum::Error),
    #[error("invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct Outgoing<'a> {
    pregunta: &'a str,
}

#[derive(Deserialize)]
struct Incoming {
    respuesta: Option<String>,
}

/// Pooled HTTP client for responder calls.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
}

impl std::fmt::Debug for Forwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forwarder")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Forwarder {
    pub fn new(timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(timeout));
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POST `pregunta` to `<base_url>/respuesta` and return the answer text.
    pub async fn ask(
        &self,
        base_url: &str,
        token: &str,
        pregunta: &str,
        request_id: Option<&str>,
    ) -> Result<String, ForwardError> {
        tokio::time::timeout(
            self.timeout,
            self.send(base_url, token, pregunta, request_id),
        )
        .await
        .map_err(|_| ForwardError::Timeout(self.timeout))?
    }

    async fn send(
        &self,
        base_url: &str,
        token: &str,
        pregunta: &str,
        request_id: Option<&str>,
    ) -> Result<String, ForwardError> {
        let target = format!("{}/respuesta", base_url.trim_end_matches('/'));
        let uri: Uri = target
            .parse()
            .map_err(|_| ForwardError::InvalidUri(target.clone()))?;

        let payload = serde_json::to_vec(&Outgoing { pregunta })?;
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", token));
        if let Some(id) = request_id {
            builder = builder.header(X_REQUEST_ID, id);
        }
        let request = builder.body(Body::from(payload))?;

        let response = self.client.request(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ForwardError::Status(status));
        }

        let bytes = axum::body::to_bytes(Body::new(response.into_body()), MAX_DOWNSTREAM_BODY).await?;
        let incoming: Incoming = serde_json::from_slice(&bytes)?;
        Ok(incoming
            .respuesta
            .unwrap_or_else(|| MISSING_ANSWER.to_string()))
    }
}
