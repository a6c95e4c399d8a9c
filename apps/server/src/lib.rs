//! Envelope - HTTP response normalization for axum services
//!
//! Every request passes through one pipeline that:
//! - tags it with a fresh `X-Request-ID`
//! - wraps buffered JSON payloads in a uniform success envelope
//! - renders every error (handler, validation, router, panic) as an error envelope
//!
//! Documentation routes and streamed bodies are forwarded untouched.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod request_context;
pub mod services;
pub mod state;

pub use crate::config::Config;
pub use error::{Error, Result};
pub use state::AppState;
