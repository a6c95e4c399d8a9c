//! Layer factories for middleware

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue},
    response::Response,
};
use std::any::Any;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any as CorsAny, CorsLayer},
};

use super::request_id::REQUEST_ID_HEADER;

/// CORS middleware
///
/// Browser clients can read `X-Request-ID` whenever CORS is enabled.
pub fn cors(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        // Secure default: do not emit permissive CORS headers unless explicitly configured.
        return CorsLayer::new();
    }

    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(CorsAny)
            .allow_methods(CorsAny)
            .allow_headers(CorsAny)
            .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)]);
    }

    let mut header_values = Vec::with_capacity(origins.len());
    for origin in origins {
        if let Ok(value) = HeaderValue::from_str(origin) {
            header_values.push(value);
        } else {
            tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
        }
    }

    // If all configured origins were invalid, fall back to no CORS.
    if header_values.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(header_values))
        .allow_methods(CorsAny)
        .allow_headers(CorsAny)
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}

/// Turns handler panics into internal errors for the exception middleware.
pub fn catch_panic() -> CatchPanicLayer<fn(Box<dyn Any + Send + 'static>) -> Response> {
    CatchPanicLayer::custom(super::exception::handle_panic as fn(_) -> Response)
}

/// Request body size limit for body extractors.
pub fn body_limit(max_bytes: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_bytes)
}
