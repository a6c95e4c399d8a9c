//! API documentation handlers
//!
//! Served under the exempt prefixes, so neither the correlation tagger nor the
//! envelope middleware touch these responses.

use axum::{extract::State, response::Html, Json};
use serde_json::{json, Map, Value};

use crate::{config::AppConfig, state::AppState};

const SWAGGER_UI_VERSION: &str = "5";
const REDOC_VERSION: &str = "2";

/// Build the OpenAPI 3.0 document describing this service.
///
/// Paths describe the handler payloads; clients should expect them inside the
/// `body` field of the success envelope.
pub fn openapi_document(app: &AppConfig) -> Value {
    let mut info = Map::new();
    info.insert("title".into(), json!(app.name));
    info.insert("version".into(), json!(app.version));
    info.insert("description".into(), json!(app.description));

    let mut contact = Map::new();
    if let Some(name) = &app.contact_name {
        contact.insert("name".into(), json!(name));
    }
    if let Some(email) = &app.contact_email {
        contact.insert("email".into(), json!(email));
    }
    if let Some(url) = &app.contact_url {
        contact.insert("url".into(), json!(url));
    }
    if !contact.is_empty() {
        info.insert("contact".into(), Value::Object(contact));
    }

    let mut license = Map::new();
    license.insert("name".into(), json!(app.license_name));
    if let Some(url) = &app.license_url {
        license.insert("url".into(), json!(url));
    }
    info.insert("license".into(), Value::Object(license));

    json!({
        "openapi": "3.0.3",
        "info": info,
        "paths": paths(),
        "components": components()
    })
}

fn paths() -> Value {
    json!({
        "/": {
            "get": { "summary": "Greeting", "responses": envelope_responses() }
        },
        "/health": {
            "get": { "summary": "Health check", "responses": envelope_responses() }
        },
        "/api/v1/user/register": {
            "post": {
                "summary": "Register a user",
                "requestBody": {
                    "required": true,
                    "content": {
                        "application/json": {
                            "schema": { "$ref": "#/components/schemas/SampleRequest" }
                        }
                    }
                },
                "responses": envelope_responses()
            }
        },
        "/api/v1/items": {
            "get": { "summary": "List catalog items", "responses": envelope_responses() }
        },
        "/api/v1/items/{item_id}": {
            "get": {
                "summary": "Fetch a catalog item",
                "parameters": [{
                    "name": "item_id",
                    "in": "path",
                    "required": true,
                    "schema": { "type": "string" }
                }],
                "responses": envelope_responses()
            }
        },
        "/api/v1/stream": {
            "get": {
                "summary": "Stream prompt tokens as Server-Sent Events",
                "parameters": [{
                    "name": "prompt",
                    "in": "query",
                    "required": true,
                    "schema": { "type": "string" }
                }],
                "responses": {
                    "200": {
                        "description": "Event stream, not enveloped",
                        "content": { "text/event-stream": {} }
                    }
                }
            }
        },
        "/api/v1/stream/json": {
            "get": {
                "summary": "Stream a JSON array progressively",
                "parameters": [{
                    "name": "count",
                    "in": "query",
                    "required": false,
                    "schema": { "type": "integer", "minimum": 0, "maximum": 1000 }
                }],
                "responses": {
                    "200": {
                        "description": "Chunked JSON array, not enveloped",
                        "content": { "application/json": {} }
                    }
                }
            }
        }
    })
}

fn components() -> Value {
    json!({
        "schemas": {
            "SampleRequest": {
                "type": "object",
                "required": ["name", "age", "email"],
                "properties": {
                    "name": { "type": "string", "minLength": 2 },
                    "age": { "type": "integer", "minimum": 0, "maximum": 120 },
                    "email": { "type": "string", "format": "email" },
                    "phone": { "type": "string" },
                    "address": { "$ref": "#/components/schemas/Address" }
                }
            },
            "Address": {
                "type": "object",
                "properties": {
                    "street": { "type": "string" },
                    "city": { "type": "string" },
                    "country": { "type": "string" },
                    "zip_code": { "type": "string", "minLength": 3, "maxLength": 10 },
                    "latitude": { "type": "number", "minimum": -90, "maximum": 90 },
                    "longitude": { "type": "number", "minimum": -180, "maximum": 180 }
                }
            },
            "SuccessEnvelope": {
                "type": "object",
                "properties": {
                    "statusCode": { "type": "string", "enum": ["OK", "ERROR"] },
                    "resultCode": { "type": "integer" },
                    "message": { "type": "string" },
                    "body": {},
                    "requestId": { "type": "string" },
                    "timestamp": { "type": "string", "format": "date-time" }
                }
            },
            "ErrorEnvelope": {
                "type": "object",
                "properties": {
                    "statusCode": { "type": "integer" },
                    "resultCode": { "type": "string" },
                    "message": { "type": "string" },
                    "path": { "type": "string" },
                    "traceId": { "type": "string", "nullable": true },
                    "errors": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "field": { "type": "string" },
                                "message": { "type": "string" },
                                "type": { "type": "string" }
                            }
                        }
                    }
                }
            }
        }
    })
}

fn envelope_responses() -> Value {
    json!({
        "200": {
            "description": "Success envelope",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/SuccessEnvelope" }
                }
            }
        },
        "default": {
            "description": "Error envelope",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/ErrorEnvelope" }
                }
            }
        }
    })
}

/// `GET /openapi.json`
pub async fn openapi_json(State(state): State<AppState>) -> Json<Value> {
    Json(openapi_document(&state.config.app))
}

/// `GET /docs`
pub async fn swagger_ui(State(state): State<AppState>) -> Html<String> {
    let title = &state.config.app.name;
    Html(format!(
        r##"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{title} - Swagger UI</title>
  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@{SWAGGER_UI_VERSION}/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@{SWAGGER_UI_VERSION}/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({{ url: "/openapi.json", dom_id: "#swagger-ui" }});
  </script>
</body>
</html>
"##
    ))
}

/// `GET /redoc`
pub async fn redoc(State(state): State<AppState>) -> Html<String> {
    let title = &state.config.app.name;
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{title} - ReDoc</title>
</head>
<body>
  <redoc spec-url="/openapi.json"></redoc>
  <script src="https://cdn.jsdelivr.net/npm/redoc@{REDOC_VERSION}/bundles/redoc.standalone.js"></script>
</body>
</html>
"#
    ))
}
