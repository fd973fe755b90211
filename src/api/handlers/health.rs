/*
 * Responsibility
 * - GET /api/health (liveness)
 * - Reachable with or without credentials
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub const SERVICE_NAME: &str = "QuizSync API";

pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "UP",
            "service": SERVICE_NAME,
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
