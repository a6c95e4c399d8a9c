//! Response envelopes
//!
//! Two shapes leave the server:
//!
//! - [`SuccessEnvelope`] wraps every buffered JSON response produced by a
//!   handler (including handler-built 4xx/5xx JSON).
//! - [`ErrorEnvelope`] is the body of errors translated by the exception
//!   middleware. It is not wrapped again.
//!
//! The shapes differ (`statusCode` is a string in one and an integer in the
//! other); clients discriminate on the HTTP status.

use axum::http::StatusCode;
use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::config::ResponseConfig;
use crate::error::{Error, FieldError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EnvelopeStatus {
    Ok,
    Error,
}

impl EnvelopeStatus {
    pub fn from_status(status: StatusCode) -> Self {
        if status.as_u16() < 400 {
            EnvelopeStatus::Ok
        } else {
            EnvelopeStatus::Error
        }
    }
}

/// Uniform wrapper around a handler's JSON payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessEnvelope {
    status_code: EnvelopeStatus,
    result_code: u16,
    message: String,
    /// The handler payload, relocated verbatim.
    body: Value,
    request_id: String,
    timestamp: DateTime<FixedOffset>,
}

impl SuccessEnvelope {
    pub fn new(
        status: StatusCode,
        body: Value,
        request_id: impl Into<String>,
        settings: &ResponseConfig,
    ) -> Self {
        Self::at(status, body, request_id, settings, Utc::now())
    }

    pub(crate) fn at(
        status: StatusCode,
        body: Value,
        request_id: impl Into<String>,
        settings: &ResponseConfig,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            status_code: EnvelopeStatus::from_status(status),
            result_code: status.as_u16(),
            message: settings.message_for(status.as_u16()).to_string(),
            body,
            request_id: request_id.into(),
            timestamp: now.with_timezone(&settings.offset()),
        }
    }

    pub fn status_code(&self) -> EnvelopeStatus {
        self.status_code
    }
}

/// Structured body for translated errors.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    status_code: u16,
    result_code: String,
    message: String,
    path: String,
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

impl ErrorEnvelope {
    /// Build the envelope for `error` raised while serving `path`.
    ///
    /// Arms are ordered most specific first; the last one is the backstop.
    pub(crate) fn from_error(error: &Error, path: &str, settings: &ResponseConfig) -> Self {
        let (message, errors) = match error {
            Error::Http { detail, .. } => (detail.clone(), None),
            Error::Validation(fields) => {
                (settings.validation_message.clone(), Some(fields.clone()))
            }
            Error::Internal(_) | Error::Other(_) => (error.to_string(), None),
        };

        Self {
            status_code: error.status().as_u16(),
            result_code: error.result_code().to_string(),
            message,
            path: path.to_string(),
            trace_id: None,
            errors,
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_success_envelope_shape() {
        let settings = ResponseConfig::default();
        let now = Utc.with_ymd_and_hms(2025, 4, 18, 5, 35, 0).unwrap();
        let envelope = SuccessEnvelope::at(
            StatusCode::OK,
            json!({"name": "Foo", "price": 50.2}),
            "req-1",
            &settings,
            now,
        );

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["statusCode"], "OK");
        assert_eq!(value["resultCode"], 200);
        assert_eq!(value["message"], "success");
        assert_eq!(value["body"], json!({"name": "Foo", "price": 50.2}));
        assert_eq!(value["requestId"], "req-1");
        assert_eq!(value["timestamp"], "2025-04-18T14:35:00+09:00");
    }

    #[test]
    fn test_success_envelope_for_client_error() {
        let settings = ResponseConfig::default();
        let envelope =
            SuccessEnvelope::new(StatusCode::CONFLICT, json!(null), "req-2", &settings);
        assert_eq!(envelope.status_code(), EnvelopeStatus::Error);

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["statusCode"], "ERROR");
        assert_eq!(value["resultCode"], 409);
        assert_eq!(value["message"], "failure");
        assert!(value["body"].is_null());
    }

    #[test]
    fn test_error_envelope_for_not_found() {
        let settings = ResponseConfig::default();
        let envelope = ErrorEnvelope::from_error(
            &Error::not_found("Item not found"),
            "/api/v1/items/nope",
            &settings,
        );
        assert_eq!(envelope.status(), StatusCode::NOT_FOUND);

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({
                "statusCode": 404,
                "resultCode": "NOT_FOUND",
                "message": "Item not found",
                "path": "/api/v1/items/nope",
                "traceId": null
            })
        );
    }

    #[test]
    fn test_error_envelope_for_validation() {
        let settings = ResponseConfig::default();
        let error = Error::Validation(vec![FieldError::new("name", "field required", "missing")]);
        let value =
            serde_json::to_value(ErrorEnvelope::from_error(&error, "/x", &settings)).unwrap();

        assert_eq!(value["statusCode"], 422);
        assert_eq!(value["resultCode"], "REQUEST_VALIDATION_ERROR");
        assert_eq!(value["message"], "input validation failed");
        assert_eq!(
            value["errors"],
            json!([{"field": "name", "message": "field required", "type": "missing"}])
        );
    }

    #[test]
    fn test_error_envelope_for_internal() {
        let settings = ResponseConfig::default();
        let value = serde_json::to_value(ErrorEnvelope::from_error(
            &Error::from(anyhow::anyhow!("boom")),
            "/crash",
            &settings,
        ))
        .unwrap();

        assert_eq!(value["statusCode"], 500);
        assert_eq!(value["resultCode"], "INTERNAL_SERVER_ERROR");
        assert_eq!(value["message"], "boom");
        assert!(value.get("errors").is_none());
    }
}
