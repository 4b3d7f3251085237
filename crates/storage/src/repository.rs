//! State Store Implementation

use crate::StorageError;
use alerting::{UserId, UserState};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// In-memory store of per-user state
///
/// One mutex guards the whole map. Holding a [`StoreGuard`] serializes every
/// read-check-mutate sequence across all users.
pub struct StateStore {
    users: Mutex<HashMap<UserId, UserState>>,
}

/// Exclusive access to the store for one critical section
pub struct StoreGuard<'a> {
    users: MutexGuard<'a, HashMap<UserId, UserState>>,
}

impl StateStore {
    /// Create an empty store
    pub fn new() -> Self {
        info!("Creating in-memory state store");
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    /// Acquire the process-wide lock
    pub fn lock(&self) -> Result<StoreGuard<'_>, StorageError> {
        let users = self
            .users
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        Ok(StoreGuard { users })
    }

    /// Number of users with tracked state
    pub fn user_count(&self) -> Result<usize, StorageError> {
        Ok(self.lock()?.users.len())
    }

    /// Copy of one user's state, if it exists
    pub fn snapshot(&self, user_id: UserId) -> Result<Option<UserState>, StorageError> {
        Ok(self.lock()?.get(user_id).cloned())
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreGuard<'_> {
    /// Existing state for `user_id`, or a fresh one stored on first use
    pub fn get_or_create(&mut self, user_id: UserId) -> &mut UserState {
        self.users.entry(user_id).or_insert_with(|| {
            debug!("Creating state for user {}", user_id);
            UserState::default()
        })
    }

    /// Existing state for `user_id`
    pub fn get(&self, user_id: UserId) -> Option<&UserState> {
        self.users.get(&user_id)
    }
}
