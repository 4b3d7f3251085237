//! Alerting Rule Engine
//!
//! Tracks rolling per-user state and evaluates the fraud rules for each
//! deposit or withdraw event.

mod error;
mod event;
mod rules;
mod settings;
mod state;
mod window;

pub use error::{AlertError, SettingsError, UnknownEventKind, WindowOverflow};
pub use event::{AlertCode, AlertResult, Event, EventKind, UserId};
pub use rules::apply;
pub use settings::{RuleSettings, ENV_PREFIX};
pub use state::UserState;
pub use window::DepositWindow;
