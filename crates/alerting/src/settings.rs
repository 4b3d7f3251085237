//! Rule thresholds and alert codes

use crate::{AlertCode, SettingsError};
use config::{Config, Environment};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Prefix of every environment variable read by the service
pub const ENV_PREFIX: &str = "MIDNIGHT";

/// Rule configuration
///
/// Field names on the wire match the `MIDNIGHT_*` environment keys, so
/// `MIDNIGHT_RULE_WITHDRAW_GT_AMOUNT=250` sets `withdraw_threshold`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSettings {
    /// Code emitted for a single large withdraw (default: 1100)
    #[serde(rename = "alert_code_withdraw_gt")]
    pub alert_withdraw_gt: AlertCode,
    /// Code emitted for consecutive withdraws (default: 30)
    #[serde(rename = "alert_code_3_consec_withdraws")]
    pub alert_3_consec_withdraws: AlertCode,
    /// Code emitted for strictly increasing deposits (default: 300)
    #[serde(rename = "alert_code_3_inc_deposits")]
    pub alert_3_inc_deposits: AlertCode,
    /// Code emitted when the windowed deposit sum is exceeded (default: 123)
    #[serde(rename = "alert_code_30s_deposits_gt")]
    pub alert_30s_deposits_gt: AlertCode,

    /// Withdraw amount above which a withdraw alerts (default: 100)
    #[serde(rename = "rule_withdraw_gt_amount")]
    pub withdraw_threshold: Decimal,
    /// Number of consecutive withdraws that alerts (default: 3)
    #[serde(rename = "rule_consec_withdraws_count")]
    pub consec_withdraws_count: u32,
    /// Length of the increasing deposit streak (default: 3)
    #[serde(rename = "rule_inc_deposits_count")]
    pub inc_deposits_count: usize,
    /// Width of the deposit sum window in time units of `t` (default: 30)
    #[serde(rename = "rule_deposit_sum_window_seconds")]
    pub deposit_sum_window: i64,
    /// Windowed deposit sum above which a deposit alerts (default: 200)
    #[serde(rename = "rule_deposit_sum_threshold")]
    pub deposit_sum_threshold: Decimal,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            alert_withdraw_gt: 1100,
            alert_3_consec_withdraws: 30,
            alert_3_inc_deposits: 300,
            alert_30s_deposits_gt: 123,
            withdraw_threshold: Decimal::new(100, 0),
            consec_withdraws_count: 3,
            inc_deposits_count: 3,
            deposit_sum_window: 30,
            deposit_sum_threshold: Decimal::new(200, 0),
        }
    }
}

impl RuleSettings {
    /// Load settings from `MIDNIGHT_*` environment variables
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_source(Environment::with_prefix(ENV_PREFIX))
    }

    /// Load settings from an environment source; unset or empty keys keep their defaults
    pub fn from_source(env: Environment) -> Result<Self, SettingsError> {
        let settings: RuleSettings = Config::builder()
            .add_source(env.try_parsing(true).ignore_empty(true))
            .build()?
            .try_deserialize()?;
        settings.validate()?;

        info!("Loaded rule settings: {:?}", settings);
        Ok(settings)
    }

    /// Reject values the rule engine cannot evaluate meaningfully
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.consec_withdraws_count == 0 {
            return Err(SettingsError::Invalid {
                field: "rule_consec_withdraws_count",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.inc_deposits_count == 0 {
            return Err(SettingsError::Invalid {
                field: "rule_inc_deposits_count",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.deposit_sum_window < 0 {
            return Err(SettingsError::Invalid {
                field: "rule_deposit_sum_window_seconds",
                reason: format!("must not be negative, got {}", self.deposit_sum_window),
            });
        }
        Ok(())
    }
}
