//! Response envelope middleware
//!
//! Rewrites buffered JSON responses into a [`SuccessEnvelope`]. Left alone:
//! exempt paths, non-JSON content types, progressive (streamed) bodies and
//! error envelopes already produced by the exception middleware.
//!
//! A body is considered buffered when its size hint is exact. Bodies built
//! from a stream never report an exact size, so they are forwarded frame by
//! frame and never drained here.

use axum::{
    body::{Body, HttpBody as _},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use serde_json::Value;

use super::exception::{translate, TranslatedError};
use crate::config::ResponseConfig;
use crate::error::Error;
use crate::models::SuccessEnvelope;
use crate::request_context::RequestContext;
use crate::state::AppState;

pub async fn response_wrapper_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let settings = &state.config.response;
    let path = req.uri().path().to_owned();
    if settings.is_exempt(&path) {
        return next.run(req).await;
    }

    let request_id = req
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id().to_owned());

    let response = next.run(req).await;
    if !should_wrap(&response) {
        return response;
    }

    let request_id = request_id.unwrap_or_else(|| {
        tracing::warn!(path = %path, "Wrapping response without a request context");
        String::new()
    });

    wrap(response, request_id, &path, settings).await
}

fn should_wrap(response: &Response) -> bool {
    response.extensions().get::<TranslatedError>().is_none()
        && is_json_response(response.headers())
        && is_buffered(response.body())
}

pub(crate) fn is_json_response(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false)
}

/// `true` when the whole body is already in memory.
pub fn is_buffered(body: &Body) -> bool {
    body.size_hint().exact().is_some()
}

async fn wrap(
    response: Response,
    request_id: String,
    path: &str,
    settings: &ResponseConfig,
) -> Response {
    let (mut parts, body) = response.into_parts();

    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, path, "Failed to read response body for wrapping");
            return translate(
                &Error::internal(format!("Failed to read response body: {e}")),
                path,
                settings,
            );
        }
    };

    let envelope = SuccessEnvelope::new(parts.status, parse_payload(&bytes), request_id, settings);

    let json = match serde_json::to_vec(&envelope) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(error = %e, path, "Failed to serialize response envelope");
            return translate(
                &Error::internal(format!("Failed to serialize response: {e}")),
                path,
                settings,
            );
        }
    };

    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    Response::from_parts(parts, Body::from(json))
}

/// Parse the drained body; bytes that are not JSON become a string value.
pub(crate) fn parse_payload(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
