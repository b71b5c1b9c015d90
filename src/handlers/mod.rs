// src/handlers/mod.rs

use axum::{Json, http::Uri, response::IntoResponse};
use serde_json::json;

use crate::error::AppError;

pub mod quiz;
pub mod scores;

/// Liveness probe. Touches no files.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
