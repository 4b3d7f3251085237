//! Alert Service Implementation

use crate::ServiceError;
use alerting::{AlertError, AlertResult, Event, RuleSettings};
use metrics::{counter, describe_counter};
use std::sync::{Arc, RwLock};
use storage::StateStore;
use tracing::{debug, info, warn};

/// Orchestrates the state store and the rule engine
pub struct AlertService {
    /// Per-user state
    store: StateStore,
    /// Active rule settings, replaceable at runtime
    settings: RwLock<Arc<RuleSettings>>,
}

impl AlertService {
    /// Create a service with an empty store
    pub fn new(settings: RuleSettings) -> Self {
        Self::with_store(StateStore::new(), settings)
    }

    /// Create a service over an existing store
    pub fn with_store(store: StateStore, settings: RuleSettings) -> Self {
        info!("Creating alert service with settings: {:?}", settings);
        Self {
            store,
            settings: RwLock::new(Arc::new(settings)),
        }
    }

    /// Register descriptions for the counters this service emits
    pub fn describe_metrics() {
        describe_counter!("midnight_events_total", "Events accepted, by type");
        describe_counter!("midnight_alerts_total", "Alert codes emitted, by code");
        describe_counter!("midnight_events_rejected_total", "Events rejected, by reason");
    }

    /// Evaluate one event for its user.
    ///
    /// Rejects the event without touching any state when `event.t` is not
    /// strictly after the user's last accepted time, or when a deposit would
    /// overflow the user's running total.
    pub fn handle(&self, event: &Event) -> Result<AlertResult, ServiceError> {
        let settings = self.settings();

        let codes = {
            let mut guard = self.store.lock()?;
            let state = guard.get_or_create(event.user_id);

            if !state.accepts(event.t) {
                warn!(
                    "Rejected event for user {}: t={} not after last_t={:?}",
                    event.user_id, event.t, state.last_t
                );
                counter!("midnight_events_rejected_total", "reason" => "non_monotonic_time")
                    .increment(1);
                return Err(AlertError::NonMonotonicTime {
                    user_id: event.user_id,
                    last_t: state.last_t,
                    new_t: event.t,
                }
                .into());
            }

            let codes = match alerting::apply(state, event.kind, event.amount, event.t, &settings) {
                Ok(codes) => codes,
                Err(overflow) => {
                    warn!(
                        "Rejected event for user {}: deposit total overflow at t={}",
                        event.user_id, overflow.t
                    );
                    counter!("midnight_events_rejected_total", "reason" => "amount_overflow")
                        .increment(1);
                    return Err(AlertError::AmountOverflow {
                        user_id: event.user_id,
                        t: overflow.t,
                    }
                    .into());
                }
            };
            state.last_t = Some(event.t);
            codes
        };

        counter!("midnight_events_total", "type" => event.kind.as_str()).increment(1);
        for code in &codes {
            counter!("midnight_alerts_total", "code" => code.to_string()).increment(1);
        }
        debug!(
            "Handled {} for user {} at t={}: alerts {:?}",
            event.kind.as_str(),
            event.user_id,
            event.t,
            codes
        );

        Ok(AlertResult::new(event.user_id, codes))
    }

    /// Current rule settings
    pub fn settings(&self) -> Arc<RuleSettings> {
        // Settings are swapped whole, so a poisoned lock still holds a valid value
        let settings = self.settings.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&settings)
    }

    /// Replace the rule settings used by subsequent events
    pub fn update_settings(&self, settings: RuleSettings) {
        info!("Updating rule settings: {:?}", settings);
        let mut current = self.settings.write().unwrap_or_else(|e| e.into_inner());
        *current = Arc::new(settings);
    }

    /// Underlying state store
    pub fn store(&self) -> &StateStore {
        &self.store
    }
}

impl Default for AlertService {
    fn default() -> Self {
        Self::new(RuleSettings::default())
    }
}
