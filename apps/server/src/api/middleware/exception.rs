//! Exception translation middleware
//!
//! Sits directly around the route handlers. Anything that escapes a handler
//! arrives here as one of:
//!
//! - a response carrying [`UnhandledError`] (handler or extractor returned
//!   [`Error`]; panics are turned into one by [`handle_panic`]),
//! - a buffered 4xx/5xx response that is not JSON: router signals (unknown
//!   method), axum's own extractor rejections, or a handler returning a bare
//!   status such as `StatusCode::UNAUTHORIZED`.
//!
//! Both are rewritten into an [`ErrorEnvelope`] carrying the request path. A
//! non-JSON error body becomes the envelope message; an empty one becomes the
//! canonical reason phrase. A bare 401 therefore reaches the client as an
//! `HTTP_EXCEPTION` envelope with message `Unauthorized`, never as an empty
//! body. Handlers that need their own error JSON return it with a JSON
//! content type.
//!
//! Every other response passes through unchanged.

use axum::{
    body::HttpBody as _,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use std::any::Any;

use super::response_wrapper::is_json_response;
use crate::config::ResponseConfig;
use crate::error::{Error, UnhandledError};
use crate::models::ErrorEnvelope;
use crate::state::AppState;

/// Marks a response whose body is an [`ErrorEnvelope`].
#[derive(Debug, Clone, Copy)]
pub struct TranslatedError;

pub async fn exception_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();
    let mut response = next.run(req).await;

    if let Some(UnhandledError(error)) = response.extensions_mut().remove::<UnhandledError>() {
        return translate(&error, &path, &state.config.response);
    }

    if is_framework_error(&response) {
        let error = framework_error(response).await;
        return translate(&error, &path, &state.config.response);
    }

    response
}

/// Map an error raised while serving `path` to its HTTP response.
pub fn translate(error: &Error, path: &str, settings: &ResponseConfig) -> Response {
    match error {
        Error::Http { status, detail } => {
            tracing::debug!(status = status.as_u16(), path, detail = %detail, "HTTP error");
        }
        Error::Validation(fields) => {
            tracing::info!(path, errors = fields.len(), "Request validation failed");
        }
        Error::Internal(_) | Error::Other(_) => {
            tracing::error!(path, error = %error, "Unhandled error");
        }
    }

    let envelope = ErrorEnvelope::from_error(error, path, settings);
    let mut response = (envelope.status(), Json(envelope)).into_response();
    response.extensions_mut().insert(TranslatedError);
    response
}

/// A buffered 4xx/5xx without a JSON body, emitted by axum or a handler
/// without going through [`Error`].
fn is_framework_error(response: &Response) -> bool {
    let status = response.status();
    (status.is_client_error() || status.is_server_error())
        && !is_json_response(response.headers())
        && response.body().size_hint().exact().is_some()
}

/// Promote a non-JSON error response into an [`Error::Http`]. The body text
/// is the detail; an empty body falls back to the canonical reason phrase.
async fn framework_error(response: Response) -> Error {
    let status = response.status();
    let reason = status.canonical_reason().unwrap_or("Unknown Error");

    let detail = match axum::body::to_bytes(response.into_body(), usize::MAX).await {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes).trim().to_string();
            if text.is_empty() {
                reason.to_string()
            } else {
                text
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, status = status.as_u16(), "Failed to read error body");
            reason.to_string()
        }
    };

    Error::http(status, detail)
}

/// Panic handler for `tower_http::catch_panic::CatchPanicLayer`.
///
/// The panic payload becomes an [`Error::Internal`] so the exception
/// middleware renders it like any other unexpected failure.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "Unknown panic".to_string()
    };

    Error::Internal(message).into_response()
}
