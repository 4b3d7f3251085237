//! Prefix-sum sliding window over deposits
//!
//! Deposits are stored as `(time, cumulative total)` pairs. The sum over any
//! half-open window `(from, to]` is the difference of two prefix lookups, each
//! a binary search over the times.

use crate::WindowOverflow;
use rust_decimal::Decimal;
use std::collections::VecDeque;

/// Running totals of a user's deposits, indexed by time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepositWindow {
    /// Deposit times, strictly increasing
    times: VecDeque<i64>,
    /// `cums[i]` is the total of every deposit after the anchor and at or
    /// before `times[i]`
    cums: VecDeque<Decimal>,
}

impl DepositWindow {
    /// Record a deposit. `t` must be greater than every recorded time.
    ///
    /// Fails without changing anything if the running total would overflow.
    pub fn push(&mut self, t: i64, amount: Decimal) -> Result<(), WindowOverflow> {
        debug_assert!(self.times.back().map_or(true, |&last| t > last));
        let cum = self.last_cum().checked_add(amount).ok_or(WindowOverflow { t })?;
        self.times.push_back(t);
        self.cums.push_back(cum);
        Ok(())
    }

    /// Cumulative deposit total at or before `tq`; zero if nothing precedes it.
    ///
    /// Totals are relative to the last pruning anchor, so only differences
    /// between queries at or after the last cutoff are meaningful.
    pub fn cum_at(&self, tq: i64) -> Decimal {
        match self.times.partition_point(|&time| time <= tq) {
            0 => Decimal::ZERO,
            idx => self.cums[idx - 1],
        }
    }

    /// Sum of deposits with time in `(t - window, t]`
    pub fn window_sum(&self, t: i64, window: i64) -> Decimal {
        self.cum_at(t) - self.cum_at(t.saturating_sub(window))
    }

    /// Drop entries strictly before the last one at or before `cutoff`, then
    /// rebase the totals so that anchor holds zero.
    ///
    /// The kept anchor answers `cum_at` for any query at or after `cutoff`.
    pub fn prune(&mut self, cutoff: i64) {
        let anchor = match self.times.partition_point(|&time| time <= cutoff) {
            0 => return,
            idx => idx - 1,
        };
        self.times.drain(..anchor);
        self.cums.drain(..anchor);

        let base = self.cums[0];
        if !base.is_zero() {
            for cum in self.cums.iter_mut() {
                *cum -= base;
            }
        }
    }

    /// Record a deposit at `t` and return the sum over `(t - window, t]`,
    /// pruning everything that window no longer reaches.
    ///
    /// Overflow is checked against the rebased totals before anything is
    /// modified, so an `Err` leaves the window untouched.
    pub fn record(
        &mut self,
        t: i64,
        amount: Decimal,
        window: i64,
    ) -> Result<Decimal, WindowOverflow> {
        let cutoff = t.saturating_sub(window);
        // Running total relative to the anchor that pruning at `cutoff` keeps
        let retained = self.last_cum() - self.cum_at(cutoff);
        retained.checked_add(amount).ok_or(WindowOverflow { t })?;

        self.prune(cutoff);
        self.push(t, amount)?;
        Ok(self.window_sum(t, window))
    }

    fn last_cum(&self) -> Decimal {
        self.cums.back().copied().unwrap_or(Decimal::ZERO)
    }

    /// Number of retained entries
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Retained deposit times, oldest first
    pub fn times(&self) -> impl Iterator<Item = i64> + '_ {
        self.times.iter().copied()
    }

    /// Retained cumulative totals, aligned with [`DepositWindow::times`]
    pub fn cums(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.cums.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dec(v: i64) -> Decimal {
        Decimal::new(v, 0)
    }

    fn brute_force(deposits: &[(i64, Decimal)], t: i64, window: i64) -> Decimal {
        let from = t.saturating_sub(window);
        deposits
            .iter()
            .filter(|(time, _)| *time > from && *time <= t)
            .map(|(_, amount)| *amount)
            .sum()
    }

    #[test]
    fn test_cum_at() {
        let mut window = DepositWindow::default();
        window.push(1, dec(100)).unwrap();
        window.push(5, dec(150)).unwrap();

        assert_eq!(window.cum_at(0), dec(0));
        assert_eq!(window.cum_at(1), dec(100));
        assert_eq!(window.cum_at(4), dec(100));
        assert_eq!(window.cum_at(5), dec(250));
        assert_eq!(window.cum_at(i64::MAX), dec(250));
    }

    #[test]
    fn test_window_bounds_are_half_open() {
        let mut window = DepositWindow::default();
        window.push(10, dec(1)).unwrap();
        window.push(40, dec(2)).unwrap();

        // (10, 40] excludes the deposit at exactly t - window
        assert_eq!(window.window_sum(40, 30), dec(2));
        assert_eq!(window.window_sum(40, 31), dec(3));
    }

    #[test]
    fn test_prune_keeps_one_anchor() {
        let mut window = DepositWindow::default();
        for (t, amount) in [(1, 10), (2, 20), (3, 30), (50, 40)] {
            window.push(t, dec(amount)).unwrap();
        }

        window.prune(20);

        assert_eq!(window.times().collect::<Vec<_>>(), vec![3, 50]);
        // Rebased onto the anchor at t=3
        assert_eq!(window.cums().collect::<Vec<_>>(), vec![dec(0), dec(40)]);
        assert_eq!(window.window_sum(50, 30), dec(40));
    }

    #[test]
    fn test_prune_before_first_entry_is_noop() {
        let mut window = DepositWindow::default();
        window.push(10, dec(5)).unwrap();
        window.prune(3);
        assert_eq!(window.len(), 1);
        assert_eq!(window.cums().collect::<Vec<_>>(), vec![dec(5)]);
    }

    #[test]
    fn test_saturating_cutoff() {
        let mut window = DepositWindow::default();
        window.push(i64::MIN + 1, dec(5)).unwrap();
        // cutoff saturates to i64::MIN + 1, which the half-open window excludes
        assert_eq!(window.record(0, dec(7), i64::MAX), Ok(dec(7)));
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn test_push_overflow_leaves_window_unchanged() {
        let mut window = DepositWindow::default();
        window.push(1, Decimal::MAX).unwrap();
        let before = window.clone();

        assert_eq!(window.push(2, Decimal::MAX), Err(WindowOverflow { t: 2 }));
        assert_eq!(window, before);
    }

    #[test]
    fn test_record_overflow_leaves_window_unchanged() {
        let mut window = DepositWindow::default();
        assert_eq!(window.record(1, Decimal::MAX, 30), Ok(Decimal::MAX));
        let before = window.clone();

        assert_eq!(window.record(2, Decimal::MAX, 30), Err(WindowOverflow { t: 2 }));
        assert_eq!(window, before);
        assert_eq!(window.record(3, dec(0), 30), Ok(Decimal::MAX));
    }

    #[test]
    fn test_record_rebases_large_totals() {
        let mut window = DepositWindow::default();
        // Each deposit fits on its own; the running total never would
        for t in [1, 100, 200, 300] {
            assert_eq!(window.record(t, Decimal::MAX, 30), Ok(Decimal::MAX));
        }
        assert_eq!(window.len(), 2);
    }

    fn deposit_stream() -> impl Strategy<Value = Vec<(i64, Decimal)>> {
        proptest::collection::vec((1i64..20, 0i64..100_000, 0u32..3), 0..60).prop_map(|steps| {
            let mut t = -50;
            steps
                .into_iter()
                .map(|(gap, mantissa, scale)| {
                    t += gap;
                    (t, Decimal::new(mantissa, scale))
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_window_sum_matches_brute_force(
            deposits in deposit_stream(),
            window_len in 0i64..80,
            query_offset in -100i64..100,
        ) {
            let mut window = DepositWindow::default();
            for (t, amount) in &deposits {
                window.push(*t, *amount).unwrap();
                prop_assert_eq!(
                    window.window_sum(*t, window_len),
                    brute_force(&deposits, *t, window_len)
                );
            }
            let t = deposits.last().map_or(0, |(t, _)| *t) + query_offset;
            prop_assert_eq!(window.window_sum(t, window_len), brute_force(&deposits, t, window_len));
        }

        #[test]
        fn prop_pruning_preserves_future_sums(
            deposits in deposit_stream(),
            window_len in 0i64..80,
            later in 0i64..120,
        ) {
            let mut pruned = DepositWindow::default();
            let mut full = DepositWindow::default();
            for (t, amount) in &deposits {
                full.push(*t, *amount).unwrap();
                prop_assert_eq!(
                    pruned.record(*t, *amount, window_len),
                    Ok(full.window_sum(*t, window_len))
                );
            }
            if let Some((last, _)) = deposits.last() {
                let t = last + later;
                prop_assert_eq!(pruned.window_sum(t, window_len), full.window_sum(t, window_len));
                prop_assert!(pruned.times().filter(|time| *time <= last - window_len).count() <= 1);
            }
        }
    }
}
