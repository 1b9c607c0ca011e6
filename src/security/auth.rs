//! Static bearer-token middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::response::ApiError;
use crate::http::server::AppState;

/// True when `path` starts with one of the public prefixes.
pub fn is_public_path(path: &str, public_paths: &[String]) -> bool {
    public_paths.iter().any(|prefix| path.starts_with(prefix.as_str()))
}

/// True when the Authorization header is exactly `Bearer <token>`.
pub fn is_authorized(authorization: Option<&str>, token: &str) -> bool {
    match authorization.and_then(|value| value.strip_prefix("Bearer ")) {
        Some(provided) => provided == token,
        None => false,
    }
}

/// Rejects non-public requests lacking the configured bearer token.
pub async fn bearer_auth(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let current = state.current();
    let auth = &current.config.auth;

    if is_public_path(request.uri().path(), &auth.public_paths) {
        return next.run(request).await;
    }

    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    if is_authorized(provided, &auth.token) {
        return next.run(request).await;
    }

    tracing::warn!(
        role = %current.role,
        path = %request.uri().path(),
        "Rejected request with missing or invalid token"
    );
    ApiError::Unauthorized.into_response()
}
