//! Documentation routes
//!
//! All of these live under the default exempt prefixes and are served as-is.

use crate::api::handlers::docs;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn docs_routes() -> Router<AppState> {
    Router::new()
        .route("/openapi.json", get(docs::openapi_json))
        .route("/docs", get(docs::swagger_ui))
        .route("/redoc", get(docs::redoc))
}
