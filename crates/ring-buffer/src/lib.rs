//! Bounded Ring Buffer
//!
//! Keeps the most recent N values in arrival order. Used by the rule engine
//! to track the last deposits of a user for the increasing-streak rule.

mod buffer;

pub use buffer::{RingBuffer, DEFAULT_CAPACITY};
