//! Request/response models for the demonstration routes

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Payload for `POST /api/v1/user/register`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SampleRequest {
    #[validate(length(min = 2, message = "name must be at least 2 characters"))]
    pub name: String,

    #[validate(range(min = 0, max = 120, message = "age must be between 0 and 120"))]
    pub age: i32,

    #[validate(email(message = "value is not a valid email address"))]
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 3, max = 10, message = "zip_code must be 3 to 10 characters"))]
    pub zip_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SampleResponse {
    pub message: String,
    pub data: SampleRequest,
    pub timestamp: DateTime<FixedOffset>,
}

/// Catalog entry served by `GET /api/v1/items/{item_id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub name: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
