use anyhow::Context as _;
use axum::http::{HeaderMap, StatusCode};
use chrono::DateTime;
use serde_json::Value;
use uuid::Uuid;

pub fn assert_status(actual: StatusCode, expected: StatusCode, context: &str) {
    assert_eq!(actual, expected, "{context}: unexpected status");
}

/// Assert the `X-Request-ID` header is a v4 UUID and return it.
pub fn assert_request_id(headers: &HeaderMap) -> anyhow::Result<String> {
    let value = headers
        .get("x-request-id")
        .context("X-Request-ID header present")?
        .to_str()
        .context("X-Request-ID is ASCII")?
        .to_string();
    let parsed = Uuid::parse_str(&value).context("X-Request-ID is a UUID")?;
    assert_eq!(parsed.get_version_num(), 4, "X-Request-ID should be UUID v4");
    Ok(value)
}

/// Assert `value` is a success envelope and return its `body`.
pub fn assert_success_envelope<'a>(
    value: &'a Value,
    status: StatusCode,
    request_id: &str,
) -> anyhow::Result<&'a Value> {
    let object = value.as_object().context("envelope is an object")?;
    let keys: Vec<&str> = object.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["statusCode", "resultCode", "message", "body", "requestId", "timestamp"],
        "success envelope keys"
    );

    let expected_code = if status.is_success() { "OK" } else { "ERROR" };
    assert_eq!(value["statusCode"], expected_code);
    assert_eq!(value["resultCode"], status.as_u16());
    assert_eq!(value["requestId"], request_id);

    let timestamp = value["timestamp"].as_str().context("timestamp is a string")?;
    assert_timestamp_offset(timestamp, "+09:00")?;

    value.get("body").context("envelope body")
}

/// Assert `value` is an error envelope with the given status and result code.
pub fn assert_error_envelope(
    value: &Value,
    status: StatusCode,
    result_code: &str,
    path: &str,
) -> anyhow::Result<()> {
    assert_eq!(value["statusCode"], status.as_u16(), "error statusCode");
    assert_eq!(value["resultCode"], result_code, "error resultCode");
    assert_eq!(value["path"], path, "error path");
    assert!(value["traceId"].is_null(), "traceId should be null");
    assert!(value["message"].is_string(), "message should be a string");
    assert!(value.get("requestId").is_none(), "error envelope is not re-wrapped");
    Ok(())
}

pub fn assert_timestamp_offset(timestamp: &str, offset: &str) -> anyhow::Result<()> {
    DateTime::parse_from_rfc3339(timestamp)
        .with_context(|| format!("timestamp `{timestamp}` is RFC 3339"))?;
    assert!(
        timestamp.ends_with(offset),
        "timestamp `{timestamp}` should end with {offset}"
    );
    Ok(())
}
