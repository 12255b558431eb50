use axum::{Json, Router, http::StatusCode, routing::get};
use chrono::Utc;
use serde_json::{Value, json};
use util::state::AppState;

use crate::response::ApiResponse;

/// GET /api/health
///
/// Public liveness check.
async fn health() -> (StatusCode, Json<ApiResponse<Value>>) {
    (
        StatusCode::OK,
        Json(ApiResponse::success(
            json!({ "timestamp": Utc::now().to_rfc3339() }),
            "Service is healthy",
        )),
    )
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health))
}
