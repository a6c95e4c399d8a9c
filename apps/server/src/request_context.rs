//! Per-request context injected by the correlation tagger.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::Error;

/// Request-scoped data shared between middleware and handlers.
///
/// Inserted into the request extensions by
/// [`request_id_middleware`](crate::api::middleware::request_id_middleware)
/// before any handler runs; handlers take it as an extractor argument.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
}

impl RequestContext {
    /// Context with a fresh random (v4) request id.
    pub fn generate() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .ok_or_else(|| {
                Error::internal("Request context missing; correlation middleware not installed")
            })
    }
}
