//! Forward recalculation of a plan after an edit.

use tracing::debug;

use super::{BettingConfig, DayResult};

/// Recompute every day from `from_index` to the end of the plan.
///
/// Days before `from_index` are copied untouched. The running balance starts
/// at the previous day's closing balance (or day 1's opening balance when
/// `from_index` is 0), then each day is re-priced from its stored stake
/// percentages, odds and results and re-settled. Recorded results are kept
/// as-is; nothing here invents an outcome.
///
/// The input is never modified. An out-of-range index returns an unchanged copy.
pub fn recalc_plan_from(
    plan: &[DayResult],
    from_index: usize,
    config: &BettingConfig,
) -> Vec<DayResult> {
    let mut next = plan.to_vec();
    if from_index >= next.len() {
        debug!(from_index, days = next.len(), "recalc index out of range");
        return next;
    }

    let mut running_balance = match from_index {
        0 => next[0].current_balance,
        i => next[i - 1].balance_after_day,
    };

    for day in &mut next[from_index..] {
        day.current_balance = running_balance;
        for bet in &mut day.bets {
            bet.reprice(running_balance);
        }
        day.settle(config.reinvestment_percentage);
        running_balance = day.balance_after_day;
    }

    next
}
