//! Event and result types

use crate::UnknownEventKind;
use rust_decimal::Decimal;
use serde::Serialize;

/// User identifier
pub type UserId = i64;

/// Caller-configured integer identifying which rule fired
pub type AlertCode = i64;

/// Kind of financial event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Deposit,
    Withdraw,
}

impl EventKind {
    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Deposit => "deposit",
            EventKind::Withdraw => "withdraw",
        }
    }
}

impl std::str::FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(EventKind::Deposit),
            "withdraw" => Ok(EventKind::Withdraw),
            other => Err(UnknownEventKind(other.to_string())),
        }
    }
}

/// A validated deposit or withdraw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    /// Non-negative amount
    pub amount: Decimal,
    pub user_id: UserId,
    /// Per-user strictly increasing timestamp
    pub t: i64,
}

impl Event {
    pub fn deposit(user_id: UserId, amount: Decimal, t: i64) -> Self {
        Self { kind: EventKind::Deposit, amount, user_id, t }
    }

    pub fn withdraw(user_id: UserId, amount: Decimal, t: i64) -> Self {
        Self { kind: EventKind::Withdraw, amount, user_id, t }
    }
}

/// Outcome of evaluating one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertResult {
    /// True iff `alert_codes` is non-empty
    pub alert: bool,
    pub alert_codes: Vec<AlertCode>,
    pub user_id: UserId,
}

impl AlertResult {
    pub fn new(user_id: UserId, alert_codes: Vec<AlertCode>) -> Self {
        Self {
            alert: !alert_codes.is_empty(),
            alert_codes,
            user_id,
        }
    }
}
