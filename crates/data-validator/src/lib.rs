//! Event Payload Validation
//!
//! Turns a decoded JSON payload into a typed [`alerting::Event`], collecting
//! every field error instead of stopping at the first one.

mod error;
mod validator;

pub use error::ValidationError;
pub use validator::Validator;
