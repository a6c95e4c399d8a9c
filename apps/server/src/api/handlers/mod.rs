//! Request handlers for API endpoints
//!
//! Handlers return plain payloads or [`crate::Error`]; wrapping and error
//! rendering happen in the middleware pipeline.

pub mod docs;
pub mod items;
pub mod sample;
pub mod stream;
pub mod system;

pub use docs::*;
pub use items::*;
pub use sample::*;
pub use stream::*;
pub use system::*;
