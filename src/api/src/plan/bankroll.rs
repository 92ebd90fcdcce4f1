//! Realized balance and bankroll injections.

use super::{generate_plan, BettingConfig, DayResult};

/// Balance the owner actually holds right now.
///
/// This is the closing balance of the latest completed day. With nothing
/// completed it falls back to the plan's opening balance, then to the
/// configured budget for an empty plan.
pub fn current_balance(plan: &[DayResult], config: &BettingConfig) -> f64 {
    plan.iter()
        .rev()
        .find(|d| d.is_completed())
        .map(|d| d.balance_after_day)
        .or_else(|| plan.first().map(|d| d.current_balance))
        .unwrap_or(config.initial_budget)
}

/// Add `amount` to the bankroll and restart the projection from it.
///
/// The new budget is `current_balance + amount`. The whole plan is
/// regenerated from that budget, so every recorded result is dropped.
/// Returns the updated config together with the new plan.
pub fn add_bankroll(
    config: &BettingConfig,
    current_balance: f64,
    amount: f64,
) -> (BettingConfig, Vec<DayResult>) {
    let budget = current_balance + amount;
    let config = BettingConfig {
        initial_budget: budget,
        ..config.clone()
    };
    let plan = generate_plan(&config, budget);
    (config, plan)
}
