//! Bankroll plan engine.
//!
//! Pure functions that project a day-by-day compounding bet schedule from a
//! [`BettingConfig`] and recompute its tail whenever a bet changes. Every
//! operation takes a plan by reference and returns a new plan value.

pub mod bankroll;
pub mod bets;
pub mod generate;
pub mod recalc;

pub use bankroll::{add_bankroll, current_balance};
pub use bets::{add_bet_to_day, remove_bet_from_day, update_bet, BetUpdate};
pub use generate::generate_plan;
pub use recalc::recalc_plan_from;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Staking strategy parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BettingConfig {
    /// Seed capital
    pub initial_budget: f64,
    /// Default payout multiplier per bet
    pub odds: f64,
    /// Share (0-100) of each day's net profit carried into the next day
    pub reinvestment_percentage: f64,
    /// Number of bets seeded per day
    pub bets_per_day: u32,
    /// Default share (0-100) of the day's balance risked per bet
    pub stake_percentage: f64,
    pub start_date: NaiveDate,
    /// Inclusive
    pub end_date: NaiveDate,
}

/// Recorded outcome of a single bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetOutcome {
    Win,
    Lose,
}

/// Day state once every bet has an outcome. A pending day has no status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Completed,
}

/// One wager within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualBet {
    pub id: String,
    pub stake_percentage: f64,
    pub stake: f64,
    pub odds: f64,
    pub potential_win: f64,
    pub result: Option<BetOutcome>,
}

impl IndividualBet {
    /// Create an unresolved bet priced against `balance`.
    pub fn new(id: String, stake_percentage: f64, odds: f64, balance: f64) -> Self {
        let mut bet = Self {
            id,
            stake_percentage,
            stake: 0.0,
            odds,
            potential_win: 0.0,
            result: None,
        };
        bet.reprice(balance);
        bet
    }

    /// Recompute `stake` and `potential_win` from the drivers.
    pub fn reprice(&mut self, balance: f64) {
        self.stake = balance * self.stake_percentage / 100.0;
        self.potential_win = self.stake * self.odds;
    }

    /// Net profit once resolved: `potential_win - stake` on a win, `-stake` on a loss.
    pub fn resolved_profit(&self) -> Option<f64> {
        match self.result? {
            BetOutcome::Win => Some(self.potential_win - self.stake),
            BetOutcome::Lose => Some(-self.stake),
        }
    }
}

/// Projection for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayResult {
    /// 1-based
    pub day: u32,
    pub date: NaiveDate,
    pub bets: Vec<IndividualBet>,
    pub current_balance: f64,
    pub total_stake: f64,
    pub total_potential_win: f64,
    pub balance_after_day: f64,
    pub result: Option<DayStatus>,
}

impl DayResult {
    pub fn is_completed(&self) -> bool {
        self.result == Some(DayStatus::Completed)
    }

    /// Derive totals, status and closing balance from the bets and `current_balance`.
    ///
    /// A day is completed only when it has bets and all of them are resolved.
    /// Completed days close on realized profit; anything else is projected as
    /// if every bet wins.
    pub(crate) fn settle(&mut self, reinvestment_percentage: f64) {
        self.total_stake = self.bets.iter().map(|b| b.stake).sum();
        self.total_potential_win = self.bets.iter().map(|b| b.potential_win).sum();

        let completed = !self.bets.is_empty() && self.bets.iter().all(|b| b.result.is_some());
        self.result = completed.then_some(DayStatus::Completed);

        let profit = if completed {
            self.bets.iter().filter_map(IndividualBet::resolved_profit).sum()
        } else {
            self.total_potential_win - self.total_stake
        };

        self.balance_after_day = self.current_balance + profit * reinvestment_percentage / 100.0;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Single-bet, 100% reinvestment strategy used across engine tests.
    pub fn config(days: u32) -> BettingConfig {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        BettingConfig {
            initial_budget: 100.0,
            odds: 2.0,
            reinvestment_percentage: 100.0,
            bets_per_day: 1,
            stake_percentage: 10.0,
            start_date: start,
            end_date: start + chrono::Duration::days(i64::from(days) - 1),
        }
    }

    pub fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    /// Check the chaining, completion and pricing invariants over a whole plan.
    pub fn assert_consistent(plan: &[DayResult], config: &BettingConfig) {
        for (i, day) in plan.iter().enumerate() {
            assert_eq!(day.day as usize, i + 1);
            if i > 0 {
                assert_close(day.current_balance, plan[i - 1].balance_after_day);
            }

            let completed = !day.bets.is_empty() && day.bets.iter().all(|b| b.result.is_some());
            assert_eq!(day.is_completed(), completed);

            for bet in &day.bets {
                assert_close(bet.stake, day.current_balance * bet.stake_percentage / 100.0);
                assert_close(bet.potential_win, bet.stake * bet.odds);
            }

            let mut expected = day.clone();
            expected.settle(config.reinvestment_percentage);
            assert_close(day.balance_after_day, expected.balance_after_day);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_resolved_profit() {
        let mut bet = IndividualBet::new("1-1".to_string(), 10.0, 2.5, 200.0);
        assert_close(bet.stake, 20.0);
        assert_close(bet.potential_win, 50.0);
        assert_eq!(bet.resolved_profit(), None);

        bet.result = Some(BetOutcome::Win);
        assert_close(bet.resolved_profit().unwrap(), 30.0);

        bet.result = Some(BetOutcome::Lose);
        assert_close(bet.resolved_profit().unwrap(), -20.0);
    }

    #[test]
    fn test_partially_resolved_day_is_projected() {
        let mut day = DayResult {
            day: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            bets: vec![
                IndividualBet::new("1-1".to_string(), 10.0, 2.0, 100.0),
                IndividualBet::new("1-2".to_string(), 10.0, 2.0, 100.0),
            ],
            current_balance: 100.0,
            total_stake: 0.0,
            total_potential_win: 0.0,
            balance_after_day: 0.0,
            result: None,
        };
        day.bets[0].result = Some(BetOutcome::Lose);
        day.settle(100.0);

        assert_eq!(day.result, None);
        // Optimistic: both bets counted as wins
        assert_close(day.balance_after_day, 120.0);
    }

    #[test]
    fn test_json_shape() {
        let plan = generate_plan(&config(1), 100.0);
        let value = serde_json::to_value(&plan).unwrap();

        let day = &value[0];
        assert_eq!(day["date"], "2024-01-01");
        assert_eq!(day["result"], serde_json::Value::Null);
        assert_eq!(day["bets"][0]["id"], "1-1");
        assert_eq!(day["bets"][0]["result"], serde_json::Value::Null);
        assert!(day.get("balanceAfterDay").is_some());
        assert!(day.get("totalPotentialWin").is_some());
    }

    #[test]
    fn test_json_round_trip() {
        let config = config(4);
        let plan = generate_plan(&config, config.initial_budget);
        let plan = update_bet(
            &plan,
            1,
            "2-1",
            &BetUpdate {
                result: Some(Some(BetOutcome::Lose)),
                ..Default::default()
            },
            &config,
        );

        let json = serde_json::to_string(&plan).unwrap();
        let decoded: Vec<DayResult> = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, plan);
        assert_eq!(decoded[1].result, Some(DayStatus::Completed));
    }
}
