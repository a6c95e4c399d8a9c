//! Item catalog handlers

use axum::{extract::State, Json};
use serde_json::{Map, Value};

use crate::{api::extractors::PathParams, error::Error, models::Item, state::AppState, Result};

/// `GET /api/v1/items/{item_id}`
pub async fn get_item(
    State(state): State<AppState>,
    PathParams(item_id): PathParams<String>,
) -> Result<Json<Item>> {
    state
        .catalog
        .get(&item_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| Error::not_found("Item not found"))
}

/// `GET /api/v1/items`: all items keyed by id.
pub async fn list_items(State(state): State<AppState>) -> Result<Json<Value>> {
    let mut items = Map::new();
    for (id, item) in state.catalog.list() {
        let value = serde_json::to_value(item)
            .map_err(|e| Error::internal(format!("Failed to serialize item {id}: {e}")))?;
        items.insert(id.to_string(), value);
    }
    Ok(Json(Value::Object(items)))
}
