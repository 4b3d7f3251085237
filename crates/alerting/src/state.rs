//! Per-user rolling state

use crate::DepositWindow;
use ring_buffer::RingBuffer;
use rust_decimal::Decimal;

/// Rolling aggregates for one user (tracked across events)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserState {
    /// Withdraws since the last deposit
    pub consec_withdraws: u32,

    /// Most recent deposit amounts, capacity = configured streak length
    pub last_deposits: RingBuffer<Decimal>,

    /// Prefix sums for the deposit window rule
    pub deposits: DepositWindow,

    /// Time of the last accepted event
    pub last_t: Option<i64>,
}

impl UserState {
    /// True when `t` may be accepted after the last event
    pub fn accepts(&self, t: i64) -> bool {
        self.last_t.map_or(true, |last| t > last)
    }
}
