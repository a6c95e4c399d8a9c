//! Streaming handlers
//!
//! Both routes produce progressive bodies and are therefore forwarded by the
//! envelope middleware without buffering.

use async_stream::stream;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
};
use futures::Stream;
use serde::Deserialize;
use std::{convert::Infallible, time::Duration};

use crate::{
    api::extractors::QueryParams,
    error::{Error, FieldError},
    Result,
};

const TOKEN_DELAY: Duration = Duration::from_millis(20);
const MAX_JSON_ITEMS: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct PromptQuery {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CountQuery {
    #[serde(default)]
    pub count: Option<usize>,
}

/// `GET /api/v1/stream?prompt=...`
///
/// Server-Sent Events, one event per whitespace-separated token of the
/// prompt, then a final `[DONE]` event.
pub async fn stream_prompt(
    QueryParams(query): QueryParams<PromptQuery>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let prompt = match query.prompt {
        Some(prompt) if !prompt.trim().is_empty() => prompt,
        _ => {
            return Err(Error::Validation(vec![FieldError::new(
                "prompt",
                "field required",
                "missing",
            )]))
        }
    };

    let tokens: Vec<String> = prompt.split_whitespace().map(str::to_owned).collect();
    tracing::debug!(tokens = tokens.len(), "Streaming prompt tokens");

    let events = stream! {
        for token in tokens {
            tokio::time::sleep(TOKEN_DELAY).await;
            yield Ok(Event::default().data(token));
        }
        yield Ok(Event::default().data("[DONE]"));
    };

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

/// `GET /api/v1/stream/json?count=N`
///
/// A JSON array emitted element by element with an `application/json`
/// content type.
pub async fn stream_json(QueryParams(query): QueryParams<CountQuery>) -> Result<Response> {
    let count = query.count.unwrap_or(5);
    if count > MAX_JSON_ITEMS {
        return Err(Error::Validation(vec![FieldError::new(
            "count",
            format!("count must be at most {MAX_JSON_ITEMS}"),
            "range",
        )]));
    }

    let chunks = stream! {
        yield Ok::<_, Infallible>(Bytes::from_static(b"["));
        for index in 0..count {
            tokio::time::sleep(TOKEN_DELAY).await;
            let separator = if index == 0 { "" } else { "," };
            yield Ok(Bytes::from(format!("{separator}{{\"index\":{index}}}")));
        }
        yield Ok(Bytes::from_static(b"]"));
    };

    let mut response = Body::from_stream(chunks).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    Ok(response)
}
