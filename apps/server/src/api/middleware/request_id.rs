//! Request ID middleware (correlation tagger)

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::Span;

use crate::request_context::RequestContext;
use crate::state::AppState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID middleware
///
/// Outermost stage of the normalization pipeline:
/// - Generates a fresh request ID before any handler logic runs
/// - Stores it as [`RequestContext`] in the request extensions
/// - Writes it to the `X-Request-ID` response header
///
/// Requests under the configured exempt prefixes (documentation routes) are
/// forwarded untouched.
#[tracing::instrument(
    name = "http_request",
    skip_all,
    fields(
        http.method = %req.method(),
        http.route = %req.uri().path(),
        http.response.status_code = tracing::field::Empty,
        request_id = tracing::field::Empty,
    )
)]
pub async fn request_id_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    if state.config.response.is_exempt(req.uri().path()) {
        return next.run(req).await;
    }

    let current_span = Span::current();
    let start = Instant::now();

    let context = RequestContext::generate();
    let request_id = context.request_id().to_owned();
    current_span.record("request_id", request_id.as_str());

    let method = req.method().clone();
    let path = req.uri().path().to_string();

    // Make request ID available to inner middleware/handlers.
    let mut req = req;
    req.extensions_mut().insert(context);

    tracing::debug!(
        method = %method,
        path = %path,
        request_id = %request_id,
        "Incoming request"
    );

    let mut response = next.run(req).await;

    let status = response.status();
    current_span.record("http.response.status_code", status.as_u16());

    tracing::info!(
        method = %method,
        path = %path,
        status = %status.as_u16(),
        duration_ms = start.elapsed().as_millis(),
        request_id = %request_id,
        "Request completed"
    );

    // UUID text is always a valid header value.
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
