//! API layer - routes, handlers, and middleware

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;

use crate::state::AppState;
use axum::{middleware::from_fn_with_state, routing::get, Router};

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        // Favicon handler (returns 204 to prevent 404 logs)
        .route("/favicon.ico", get(handlers::favicon))
        .merge(routes::docs::docs_routes())
        .nest("/api/v1", routes::api_v1::api_v1_routes());

    pipeline(routes, state)
}

/// Wrap `routes` in the response normalization pipeline.
///
/// Outermost first: CORS, body limit, correlation tagger, envelope wrapper,
/// exception translator, panic catcher, then the routes with a 404 fallback.
/// Layers are applied in reverse order.
pub fn pipeline(routes: Router<AppState>, state: AppState) -> Router {
    let max_body_size = state.config.server.max_request_body_size;
    let cors_origins = state.config.server.cors_origins.clone();

    routes
        .fallback(handlers::not_found)
        .with_state(state.clone())
        .layer(middleware::catch_panic())
        .layer(from_fn_with_state(
            state.clone(),
            middleware::exception_middleware,
        ))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::response_wrapper_middleware,
        ))
        .layer(from_fn_with_state(state, middleware::request_id_middleware))
        // Limit request body size to prevent DoS via large payloads
        .layer(middleware::body_limit(max_body_size))
        .layer(middleware::cors(&cors_origins))
}
