//! Custom Axum extractors.

use axum::{
    async_trait,
    body::Bytes,
    extract::{
        path::ErrorKind,
        rejection::PathRejection,
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::{header, request::Parts, HeaderMap, StatusCode},
};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::{Error, FieldError};

/// JSON body extractor that runs `validator` rules before the handler.
///
/// Every failure (syntax, shape, rule) rejects with [`Error::Validation`] so the
/// client receives a 422 with field-level details. A wrong content type is a
/// 415 [`Error::Http`].
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_json_content_type(req.headers()) {
            return Err(Error::http(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Expected request with `Content-Type: application/json`",
            ));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| Error::http(e.status(), e.body_text()))?;

        let value: T = parse_json_body(&bytes)?;
        value
            .validate()
            .map_err(|e| Error::Validation(validation_field_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Query string extractor whose failures reject with [`Error::Validation`]
/// instead of axum's plain-text 400.
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| QueryParams(value))
            .map_err(|e| {
                Error::Validation(vec![FieldError::new("query", e.body_text(), "query_invalid")])
            })
    }
}

/// Path parameter extractor whose failures reject with [`Error::Validation`]
/// naming the offending parameter.
pub struct PathParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for PathParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| PathParams(value))
            .map_err(|e| Error::Validation(vec![path_field_error(&e)]))
    }
}

fn path_field_error(rejection: &PathRejection) -> FieldError {
    let field = match rejection {
        PathRejection::FailedToDeserializePathParams(e) => match e.kind() {
            ErrorKind::ParseErrorAtKey { key, .. } | ErrorKind::InvalidUtf8InPathParam { key } => {
                key.as_str()
            }
            _ => "path",
        },
        _ => "path",
    };
    FieldError::new(field, rejection.body_text(), "path_invalid")
}

/// Returns `true` for `application/json` and `application/*+json` media types.
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    let ct = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let media_type = ct.split(';').next().unwrap_or("").trim().to_lowercase();
    media_type == "application/json"
        || (media_type.starts_with("application/") && media_type.ends_with("+json"))
}

/// Deserialize a JSON request body, reporting failures as field errors.
pub fn parse_json_body<T: DeserializeOwned>(bytes: &[u8]) -> crate::Result<T> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(Error::Validation(vec![FieldError::new(
            "body",
            "field required",
            "missing",
        )]));
    }

    let value: JsonValue = serde_json::from_slice(bytes).map_err(|e| {
        Error::Validation(vec![FieldError::new(
            "body",
            format!("JSON decode error: {e}"),
            "json_invalid",
        )])
    })?;

    serde_json::from_value(value).map_err(|e| Error::Validation(vec![serde_field_error(&e)]))
}

/// Map a serde shape error onto a field error.
///
/// serde stops at the first problem, so only one entry is produced.
fn serde_field_error(error: &serde_json::Error) -> FieldError {
    let message = error.to_string();

    if let Some(field) = backticked_after(&message, "missing field ") {
        return FieldError::new(field, "field required", "missing");
    }
    if let Some(field) = backticked_after(&message, "unknown field ") {
        return FieldError::new(field, "extra fields not permitted", "extra_forbidden");
    }
    if message.starts_with("invalid type") || message.starts_with("invalid value") {
        return FieldError::new("body", message, "type_error");
    }

    FieldError::new("body", message, "value_error")
}

fn backticked_after<'a>(message: &'a str, prefix: &str) -> Option<&'a str> {
    message
        .strip_prefix(prefix)?
        .strip_prefix('`')?
        .split('`')
        .next()
}

/// Flatten `validator` errors into dotted-path field errors, sorted by field.
pub fn validation_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    collect_field_errors(None, errors, &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.kind.cmp(&b.kind)));
    out
}

fn collect_field_errors(prefix: Option<&str>, errors: &ValidationErrors, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    out.push(FieldError::new(
                        path.clone(),
                        rule_message(error),
                        error.code.to_string(),
                    ));
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                collect_field_errors(Some(&path), inner, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(Some(&format!("{path}.{index}")), inner, out);
                }
            }
        }
    }
}

fn rule_message(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => format!("failed `{}` validation", error.code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 2))]
        name: String,
        #[validate(range(min = 0, max = 120, message = "age out of range"))]
        age: i32,
        #[serde(default)]
        #[validate(nested)]
        inner: Option<Inner>,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Inner {
        #[validate(length(max = 3))]
        code: String,
    }

    #[test]
    fn test_missing_field_is_reported_by_name() {
        let err = parse_json_body::<Payload>(br#"{"age": 3}"#).unwrap_err();
        match err {
            Error::Validation(fields) => {
                assert_eq!(fields, vec![FieldError::new("name", "field required", "missing")]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_json_is_json_invalid() {
        let err = parse_json_body::<Payload>(b"{not json").unwrap_err();
        match err {
            Error::Validation(fields) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].field, "body");
                assert_eq!(fields[0].kind, "json_invalid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_body_is_missing() {
        let err = parse_json_body::<Payload>(b"  ").unwrap_err();
        assert!(matches!(err, Error::Validation(ref f) if f[0].kind == "missing"));
    }

    #[test]
    fn test_wrong_type_is_type_error() {
        let err = parse_json_body::<Payload>(br#"{"name": "ab", "age": "old"}"#).unwrap_err();
        assert!(matches!(err, Error::Validation(ref f) if f[0].kind == "type_error"));
    }

    #[test]
    fn test_rule_failures_are_flattened_and_sorted() {
        let payload: Payload =
            parse_json_body(br#"{"name": "a", "age": 200, "inner": {"code": "toolong"}}"#)
                .unwrap();
        let errors = payload.validate().unwrap_err();
        let fields = validation_field_errors(&errors);

        let paths: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(paths, vec!["age", "inner.code", "name"]);

        assert_eq!(fields[0].kind, "range");
        assert_eq!(fields[0].message, "age out of range");
        assert_eq!(fields[1].kind, "length");
        assert_eq!(fields[2].kind, "length");
        assert_eq!(fields[2].message, "failed `length` validation");
    }

    #[test]
    fn test_json_content_types() {
        let mut headers = HeaderMap::new();
        assert!(!is_json_content_type(&headers));

        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        assert!(is_json_content_type(&headers));

        headers.insert(
            header::CONTENT_TYPE,
            "Application/JSON; charset=utf-8".parse().unwrap(),
        );
        assert!(is_json_content_type(&headers));

        headers.insert(
            header::CONTENT_TYPE,
            "application/problem+json".parse().unwrap(),
        );
        assert!(is_json_content_type(&headers));

        headers.insert(header::CONTENT_TYPE, "text/plain".parse().unwrap());
        assert!(!is_json_content_type(&headers));
    }
}
