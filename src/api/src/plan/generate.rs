//! Fresh plan projection from a strategy.

use chrono::Duration;

use super::{BettingConfig, DayResult, IndividualBet};

/// Project a day-by-day plan over the inclusive date range of `config`.
///
/// Each day seeds `bets_per_day` bets at the configured stake and odds, and
/// closes on the optimistic balance (every bet assumed to win) so the next
/// day compounds from it. Input is not validated: a reversed date range
/// yields an empty plan and nonsensical numbers pass straight through.
///
/// # Arguments
/// * `config` - Strategy parameters
/// * `start_balance` - Balance available on day 1, normally `config.initial_budget`
pub fn generate_plan(config: &BettingConfig, start_balance: f64) -> Vec<DayResult> {
    let num_days = (config.end_date - config.start_date).num_days() + 1;
    if num_days <= 0 {
        return Vec::new();
    }

    let mut plan = Vec::with_capacity(num_days as usize);
    let mut balance = start_balance;

    for day in 1..=num_days as u32 {
        let bets = (1..=config.bets_per_day)
            .map(|index| {
                IndividualBet::new(
                    format!("{}-{}", day, index),
                    config.stake_percentage,
                    config.odds,
                    balance,
                )
            })
            .collect();

        let mut result = DayResult {
            day,
            date: config.start_date + Duration::days(i64::from(day - 1)),
            bets,
            current_balance: balance,
            total_stake: 0.0,
            total_potential_win: 0.0,
            balance_after_day: balance,
            result: None,
        };
        result.settle(config.reinvestment_percentage);

        balance = result.balance_after_day;
        plan.push(result);
    }

    plan
}
