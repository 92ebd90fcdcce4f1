//! Bet-level edits. Each one produces a new plan recalculated from the edited day.

use serde::{Deserialize, Deserializer};
use tracing::debug;

use super::{recalc_plan_from, BetOutcome, BettingConfig, DayResult, IndividualBet};

/// Partial update for a single bet. Omitted fields are left unchanged.
///
/// `result` distinguishes "not provided" (`None`) from an explicit JSON
/// `null` (`Some(None)`), which clears a recorded outcome.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetUpdate {
    #[serde(default)]
    pub stake_percentage: Option<f64>,
    #[serde(default)]
    pub odds: Option<f64>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub result: Option<Option<BetOutcome>>,
}

fn explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<BetOutcome>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<BetOutcome>::deserialize(deserializer).map(Some)
}

/// Append a bet to a day and recalculate from that day.
///
/// The new bet takes the configured stake percentage, capped to the headroom
/// left by the day's existing bets (never below 1%).
pub fn add_bet_to_day(
    plan: &[DayResult],
    day_index: usize,
    config: &BettingConfig,
) -> Vec<DayResult> {
    let Some(day) = plan.get(day_index) else {
        debug!(day_index, "add bet: no such day");
        return plan.to_vec();
    };

    let allocated: f64 = day.bets.iter().map(|b| b.stake_percentage).sum();
    let stake_percentage = config.stake_percentage.min((100.0 - allocated).max(1.0));

    let bet = IndividualBet::new(
        next_bet_id(day),
        stake_percentage,
        config.odds,
        day.current_balance,
    );

    let mut next = plan.to_vec();
    next[day_index].bets.push(bet);
    recalc_plan_from(&next, day_index, config)
}

/// Remove a bet by id and recalculate from its day.
pub fn remove_bet_from_day(
    plan: &[DayResult],
    day_index: usize,
    bet_id: &str,
    config: &BettingConfig,
) -> Vec<DayResult> {
    let found = plan
        .get(day_index)
        .is_some_and(|d| d.bets.iter().any(|b| b.id == bet_id));
    if !found {
        debug!(day_index, bet_id, "remove bet: no such bet");
        return plan.to_vec();
    }

    let mut next = plan.to_vec();
    next[day_index].bets.retain(|b| b.id != bet_id);
    recalc_plan_from(&next, day_index, config)
}

/// Apply a partial update to one bet and recalculate from its day.
pub fn update_bet(
    plan: &[DayResult],
    day_index: usize,
    bet_id: &str,
    update: &BetUpdate,
    config: &BettingConfig,
) -> Vec<DayResult> {
    let position = plan
        .get(day_index)
        .and_then(|d| d.bets.iter().position(|b| b.id == bet_id));
    let Some(position) = position else {
        debug!(day_index, bet_id, "update bet: no such bet");
        return plan.to_vec();
    };

    let mut next = plan.to_vec();
    let day = &mut next[day_index];
    let balance = day.current_balance;
    let bet = &mut day.bets[position];

    if let Some(stake_percentage) = update.stake_percentage {
        bet.stake_percentage = stake_percentage;
    }
    if let Some(odds) = update.odds {
        bet.odds = odds;
    }
    if let Some(result) = update.result {
        bet.result = result;
    }
    bet.reprice(balance);

    recalc_plan_from(&next, day_index, config)
}

/// First `"<day>-<n>"` id, starting at `n = bets + 1`, not already used on the day.
fn next_bet_id(day: &DayResult) -> String {
    (day.bets.len() + 1..)
        .map(|n| format!("{}-{}", day.day, n))
        .find(|id| day.bets.iter().all(|b| &b.id != id))
        .unwrap_or_default()
}
