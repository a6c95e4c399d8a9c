pub mod assertions;

use anyhow::Context as _;
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode},
    Router,
};
use envelope::{
    api::{create_router, pipeline},
    AppState, Config,
};
use serde_json::Value;
use tower::ServiceExt as _;

pub use assertions::*;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::new_with_config(|_| {})
    }

    pub fn new_with_config(configure: impl FnOnce(&mut Config)) -> Self {
        let mut config = Config::default();
        configure(&mut config);

        let state = AppState::new(config);
        let router = create_router(state.clone());

        Self { router, state }
    }

    /// Run custom routes through the same pipeline as the real router.
    pub fn with_routes(routes: Router<AppState>) -> Self {
        let state = AppState::new(Config::default());
        let router = pipeline(routes, state.clone());

        Self { router, state }
    }

    pub async fn request(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<Bytes>,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        self.request_with_extra_headers(method, path_and_query, body, &[])
            .await
    }

    pub async fn request_with_extra_headers(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<Bytes>,
        extra_headers: &[(&str, &str)],
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let response = self.send(method, path_and_query, body, extra_headers).await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("read response body")?;

        Ok((status, headers, body))
    }

    /// Dispatch and return the raw response, body unread.
    pub async fn send(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<Bytes>,
        extra_headers: &[(&str, &str)],
    ) -> anyhow::Result<axum::response::Response> {
        let mut request = Request::builder()
            .method(method)
            .uri(path_and_query)
            .header("host", "example.org")
            .header("content-type", "application/json")
            .body(match body {
                Some(bytes) => Body::from(bytes),
                None => Body::empty(),
            })
            .context("build request")?;

        for (name, value) in extra_headers {
            request.headers_mut().insert(
                name.parse::<HeaderName>().context("parse header name")?,
                value.parse::<HeaderValue>().context("parse header value")?,
            );
        }

        self.router
            .clone()
            .oneshot(request)
            .await
            .context("dispatch request")
    }

    pub async fn get_json(&self, path_and_query: &str) -> anyhow::Result<(StatusCode, HeaderMap, Value)> {
        let (status, headers, body) = self.request(Method::GET, path_and_query, None).await?;
        Ok((status, headers, to_json(&body)?))
    }
}

pub fn to_json(body: &[u8]) -> anyhow::Result<Value> {
    serde_json::from_slice(body)
        .with_context(|| format!("parse JSON body: {}", String::from_utf8_lossy(body)))
}

pub fn to_json_body(value: &Value) -> anyhow::Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(value).context("serialize JSON")?))
}
