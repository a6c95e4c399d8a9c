//! Middleware stack for the API
//!
//! The response normalization pipeline, outermost first:
//!
//! ```text
//! request_id → response_wrapper → exception → catch_panic → handler
//! ```

pub mod exception;
pub mod layers;
pub mod request_id;
pub mod response_wrapper;

// Re-export public API
pub use exception::{exception_middleware, handle_panic, translate, TranslatedError};
pub use layers::{body_limit, catch_panic, cors};
pub use request_id::{request_id_middleware, REQUEST_ID_HEADER};
pub use response_wrapper::response_wrapper_middleware;
