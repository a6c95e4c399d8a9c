//! Error types for the API
//!
//! Handlers and extractors return [`Error`]. Its [`IntoResponse`] impl does not
//! format a body: it hands the error to the exception middleware through the
//! response extensions, because only the middleware knows the request path
//! that goes into the error envelope.
//! See [`crate::api::middleware::exception`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

pub const RESULT_NOT_FOUND: &str = "NOT_FOUND";
pub const RESULT_HTTP_EXCEPTION: &str = "HTTP_EXCEPTION";
pub const RESULT_VALIDATION_ERROR: &str = "REQUEST_VALIDATION_ERROR";
pub const RESULT_INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";

#[derive(Error, Debug)]
pub enum Error {
    /// A handler (or the router) explicitly signaled a status and reason.
    #[error("{detail}")]
    Http { status: StatusCode, detail: String },

    /// The request payload failed validation before the handler ran.
    #[error("Request validation failed ({} error(s))", .0.len())]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Dotted path of the offending field, e.g. `address.zip_code`.
    pub field: String,
    pub message: String,
    /// Machine-readable rule tag, e.g. `missing`, `length`, `range`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    pub fn new(
        field: impl Into<String>,
        message: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind: kind.into(),
        }
    }
}

impl Error {
    pub fn http(status: StatusCode, detail: impl Into<String>) -> Self {
        Error::Http {
            status,
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::http(StatusCode::NOT_FOUND, detail)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::Http { status, .. } => *status,
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Internal(_) | Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Symbolic code written to `resultCode` of the error envelope.
    pub fn result_code(&self) -> &'static str {
        match self {
            Error::Http { status, .. } if *status == StatusCode::NOT_FOUND => RESULT_NOT_FOUND,
            Error::Http { .. } => RESULT_HTTP_EXCEPTION,
            Error::Validation(_) => RESULT_VALIDATION_ERROR,
            Error::Internal(_) | Error::Other(_) => RESULT_INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error handed from a handler to the exception middleware.
#[derive(Debug, Clone)]
pub struct UnhandledError(pub Arc<Error>);

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let mut response = self.status().into_response();
        response
            .extensions_mut()
            .insert(UnhandledError(Arc::new(self)));
        response
    }
}
