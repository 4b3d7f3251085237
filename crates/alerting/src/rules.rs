//! Rule evaluation
//!
//! Withdraws are checked for size and for streak length; deposits reset the
//! withdraw streak, feed the increasing-deposit streak and the windowed sum.

use crate::{AlertCode, EventKind, RuleSettings, UserState, WindowOverflow};
use rust_decimal::Decimal;
use tracing::debug;

/// Apply one event to `state` and return the triggered alert codes in rule order.
///
/// The caller has already checked that `t` is strictly after `state.last_t`
/// and commits `last_t` afterwards. On `Err` the state is unchanged.
pub fn apply(
    state: &mut UserState,
    kind: EventKind,
    amount: Decimal,
    t: i64,
    settings: &RuleSettings,
) -> Result<Vec<AlertCode>, WindowOverflow> {
    let mut alerts = Vec::new();

    match kind {
        EventKind::Withdraw => apply_withdraw(state, amount, settings, &mut alerts),
        EventKind::Deposit => apply_deposit(state, amount, t, settings, &mut alerts)?,
    }

    Ok(alerts)
}

fn apply_withdraw(
    state: &mut UserState,
    amount: Decimal,
    settings: &RuleSettings,
    alerts: &mut Vec<AlertCode>,
) {
    if amount > settings.withdraw_threshold {
        alerts.push(settings.alert_withdraw_gt);
    }

    // Keeps firing on every further withdraw until a deposit resets it
    state.consec_withdraws = state.consec_withdraws.saturating_add(1);
    if state.consec_withdraws >= settings.consec_withdraws_count {
        alerts.push(settings.alert_3_consec_withdraws);
    }
}

fn apply_deposit(
    state: &mut UserState,
    amount: Decimal,
    t: i64,
    settings: &RuleSettings,
    alerts: &mut Vec<AlertCode>,
) -> Result<(), WindowOverflow> {
    // The only fallible step runs first
    let window_sum = state.deposits.record(t, amount, settings.deposit_sum_window)?;

    state.consec_withdraws = 0;

    let streak_len = settings.inc_deposits_count;
    if state.last_deposits.capacity() != streak_len {
        debug!(
            "Resizing deposit streak buffer: {} -> {}",
            state.last_deposits.capacity(),
            streak_len
        );
        state.last_deposits.resize(streak_len);
    }
    state.last_deposits.push(amount);
    if state.last_deposits.is_full() && state.last_deposits.is_strictly_increasing() {
        alerts.push(settings.alert_3_inc_deposits);
    }

    if window_sum > settings.deposit_sum_threshold {
        alerts.push(settings.alert_30s_deposits_gt);
    }
    Ok(())
}
