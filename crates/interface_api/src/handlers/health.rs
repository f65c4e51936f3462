//! Health check handlers

use axum::Json;
use serde_json::{json, Value};

/// Liveness probe
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Readiness probe
pub async fn readiness_check() -> Json<Value> {
    Json(json!({ "status": "ready" }))
}
