//! Root, health and fallback handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::{error::Error, state::AppState};

pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Hello!" }))
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": state.config.app.name,
        "version": state.config.app.version,
    }))
}

pub async fn favicon() -> impl IntoResponse {
    // 204 keeps browsers from logging a 404 on every docs page load
    StatusCode::NO_CONTENT
}

/// Router fallback for unmatched paths.
pub async fn not_found() -> Error {
    Error::not_found("Not Found")
}
