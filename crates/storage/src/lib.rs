//! Storage Layer
//!
//! Owns every user's rolling state for the lifetime of the process.

mod repository;

pub use repository::{StateStore, StoreGuard};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("State store lock poisoned: {0}")]
    LockPoisoned(String),
}
