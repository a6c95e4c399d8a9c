//! Wrapper behavior when a buffered JSON body fails or stalls while draining.

#[allow(unused)]
mod support;

use std::{
    collections::VecDeque,
    io,
    pin::Pin,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    task::{Context, Poll},
    time::Duration,
};

use axum::{
    body::{Body, Bytes},
    http::{header, Method, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use http_body::{Frame, SizeHint};
use support::*;

enum BodyEnd {
    Fail,
    Hang,
}

/// Body that advertises an exact length, yields `chunks`, then fails or
/// never finishes. Sets `dropped` when released.
struct ScriptedBody {
    chunks: VecDeque<Bytes>,
    end: BodyEnd,
    len: u64,
    dropped: Arc<AtomicBool>,
}

impl ScriptedBody {
    fn new(chunks: &[&'static str], end: BodyEnd, dropped: Arc<AtomicBool>) -> Self {
        Self {
            chunks: chunks.iter().map(|c| Bytes::from_static(c.as_bytes())).collect(),
            end,
            len: 64,
            dropped,
        }
    }
}

impl http_body::Body for ScriptedBody {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        if let Some(chunk) = self.chunks.pop_front() {
            return Poll::Ready(Some(Ok(Frame::data(chunk))));
        }
        match self.end {
            BodyEnd::Fail => Poll::Ready(Some(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "upstream reset",
            )))),
            BodyEnd::Hang => Poll::Pending,
        }
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.len)
    }
}

impl Drop for ScriptedBody {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

fn scripted_route(end: fn() -> BodyEnd, dropped: Arc<AtomicBool>) -> Router<envelope::AppState> {
    Router::new().route(
        "/scripted",
        get(move || {
            let dropped = dropped.clone();
            async move {
                let body = ScriptedBody::new(&[r#"{"partial":"#], end(), dropped);
                Response::builder()
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::new(body))
                    .unwrap_or_default()
            }
        }),
    )
}

#[tokio::test]
async fn drain_failure_becomes_internal_server_error() -> anyhow::Result<()> {
    let dropped = Arc::new(AtomicBool::new(false));
    let app = TestApp::with_routes(scripted_route(|| BodyEnd::Fail, dropped.clone()));

    let (status, headers, body) = app.get_json("/scripted").await?;
    assert_status(status, StatusCode::INTERNAL_SERVER_ERROR, "drain failure");
    assert_request_id(&headers)?;
    assert_error_envelope(
        &body,
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_SERVER_ERROR",
        "/scripted",
    )?;
    assert!(body["message"]
        .as_str()
        .unwrap_or_default()
        .starts_with("Failed to read response body"));
    assert!(dropped.load(Ordering::SeqCst), "failed body released");
    Ok(())
}

#[tokio::test]
async fn cancelled_request_releases_partial_buffer() -> anyhow::Result<()> {
    let dropped = Arc::new(AtomicBool::new(false));
    let app = TestApp::with_routes(scripted_route(|| BodyEnd::Hang, dropped.clone()));

    // The wrapper is still draining when the client gives up.
    let outcome = tokio::time::timeout(
        Duration::from_millis(200),
        app.send(Method::GET, "/scripted", None, &[]),
    )
    .await;
    assert!(outcome.is_err(), "no response is written for a stalled drain");
    assert!(
        dropped.load(Ordering::SeqCst),
        "partially drained body released on cancellation"
    );
    Ok(())
}
