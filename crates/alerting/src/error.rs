//! Rule Engine Error Types

use crate::UserId;
use thiserror::Error;

/// Domain errors raised while accepting an event
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlertError {
    /// Event time is not strictly greater than the last accepted time
    #[error(
        "non-monotonic time: last_t={}, new_t={new_t}, user_id={user_id}",
        .last_t.map_or_else(|| "none".to_string(), |t| t.to_string())
    )]
    NonMonotonicTime {
        user_id: UserId,
        last_t: Option<i64>,
        new_t: i64,
    },

    /// Deposit would overflow the user's running deposit total
    #[error("deposit total overflow: user_id={user_id}, t={t}")]
    AmountOverflow { user_id: UserId, t: i64 },
}

/// Running deposit total exceeds the decimal range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deposit total overflow at t={t}")]
pub struct WindowOverflow {
    pub t: i64,
}

/// Event type other than deposit or withdraw
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("type must be deposit|withdraw, got {0:?}")]
pub struct UnknownEventKind(pub String);

/// Errors while loading or validating rule settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Configuration source could not be read or deserialized
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    /// A value is outside its allowed range
    #[error("Invalid setting {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}
