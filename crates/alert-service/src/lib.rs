//! Alert Service
//!
//! Entry point of the rule engine. Each event is handled in one critical
//! section: fetch the user's state, check the event time, apply the rules and
//! commit the new time.

mod service;

pub use service::AlertService;

use alerting::AlertError;
use storage::StorageError;
use thiserror::Error;

/// Errors returned by [`AlertService::handle`]
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Event rejected by a domain rule; nothing was applied
    #[error(transparent)]
    Rule(#[from] AlertError),

    /// State store unavailable
    #[error(transparent)]
    Storage(#[from] StorageError),
}
