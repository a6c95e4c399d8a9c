//! Data models: response envelopes and demonstration payloads

pub mod envelope;
pub mod sample;

pub use envelope::{EnvelopeStatus, ErrorEnvelope, SuccessEnvelope};
pub use sample::{Address, Item, SampleRequest, SampleResponse};
