//! Bearer auth and audit middleware

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

use crate::auth::SessionClaims;
use crate::AppState;

fn bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Rejects requests without a valid session token
///
/// On success the decoded claims ride along in request extensions so
/// handlers and the audit log know who is acting.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(token) = bearer_token(&request) else {
        warn!(uri = %request.uri(), "missing bearer token");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let claims = crate::auth::validate_token(token, &state.config.jwt_secret).map_err(|e| {
        warn!(uri = %request.uri(), error = ?e, "session token rejected");
        StatusCode::UNAUTHORIZED
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// One structured log line per request, tagged with the acting user
pub async fn audit_middleware(
    State(_state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let user = request
        .extensions()
        .get::<SessionClaims>()
        .map_or_else(|| "anonymous".to_string(), |c| c.sub.clone());

    let started = Instant::now();
    let response = next.run(request).await;

    info!(
        method = %method,
        uri = %uri,
        user = %user,
        status = response.status().as_u16(),
        duration_ms = started.elapsed().as_millis() as u64,
        "request handled"
    );

    response
}
