use axum::routing::get;
use axum::{Json, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// Liveness probe for load balancers and smoke tests.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}
