//! Versioned API routes, nested under `/api/v1`

use crate::api::handlers::{items, sample, stream};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/user/register", post(sample::register_user))
        .route("/items", get(items::list_items))
        .route("/items/:item_id", get(items::get_item))
        .route("/stream", get(stream::stream_prompt))
        .route("/stream/json", get(stream::stream_json))
}
