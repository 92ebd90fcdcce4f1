//! Input checks applied before anything reaches the plan engine.

use chrono::NaiveDate;
use thiserror::Error;

use crate::plan::{BetUpdate, BettingConfig, DayResult};

/// Lowest accepted decimal odds
pub const MIN_ODDS: f64 = 1.01;

/// Longest plan accepted, in days
pub const MAX_PLAN_DAYS: i64 = 3660;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{0} must be a finite number")]
    NotFinite(&'static str),

    #[error("initialBudget must be greater than 0 (got {0})")]
    NonPositiveBudget(f64),

    #[error("odds must be at least 1.01 (got {0})")]
    OddsTooLow(f64),

    #[error("{field} must be between 0 and 100 (got {value})")]
    PercentageOutOfRange { field: &'static str, value: f64 },

    #[error("betsPerDay must be at least 1")]
    NoBets,

    #[error("endDate {end} is before startDate {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("date range spans {0} days (max 3660)")]
    RangeTooLong(i64),

    #[error("amount must be greater than 0 (got {0})")]
    NonPositiveAmount(f64),

    #[error("plan overflows on day {0}: balances must stay finite")]
    Overflow(u32),
}

fn finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite(field))
    }
}

fn percentage(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if (0.0..=100.0).contains(&finite(field, value)?) {
        Ok(())
    } else {
        Err(ValidationError::PercentageOutOfRange { field, value })
    }
}

fn odds(value: f64) -> Result<(), ValidationError> {
    if finite("odds", value)? < MIN_ODDS {
        return Err(ValidationError::OddsTooLow(value));
    }
    Ok(())
}

/// Check a strategy before a plan is generated from it.
///
/// Day totals above 100% are allowed; only each percentage's own range is checked.
pub fn validate_config(config: &BettingConfig) -> Result<(), ValidationError> {
    if finite("initialBudget", config.initial_budget)? <= 0.0 {
        return Err(ValidationError::NonPositiveBudget(config.initial_budget));
    }
    odds(config.odds)?;
    percentage("reinvestmentPercentage", config.reinvestment_percentage)?;
    percentage("stakePercentage", config.stake_percentage)?;
    if config.bets_per_day == 0 {
        return Err(ValidationError::NoBets);
    }

    let span = (config.end_date - config.start_date).num_days();
    if span < 0 {
        return Err(ValidationError::EndBeforeStart {
            start: config.start_date,
            end: config.end_date,
        });
    }
    if span + 1 > MAX_PLAN_DAYS {
        return Err(ValidationError::RangeTooLong(span + 1));
    }

    Ok(())
}

/// Check the fields a bet edit provides.
pub fn validate_bet_update(update: &BetUpdate) -> Result<(), ValidationError> {
    if let Some(value) = update.stake_percentage {
        percentage("stakePercentage", value)?;
    }
    if let Some(value) = update.odds {
        odds(value)?;
    }
    Ok(())
}

/// Check a bankroll injection amount.
pub fn validate_amount(amount: f64) -> Result<(), ValidationError> {
    if finite("amount", amount)? <= 0.0 {
        return Err(ValidationError::NonPositiveAmount(amount));
    }
    Ok(())
}

/// Check that a projected plan only holds finite amounts.
///
/// Accepted strategies can still compound past `f64::MAX` over a long range;
/// such a plan cannot be stored as JSON.
pub fn validate_plan(plan: &[DayResult]) -> Result<(), ValidationError> {
    let overflowed = plan.iter().find(|day| {
        let totals = [
            day.current_balance,
            day.total_stake,
            day.total_potential_win,
            day.balance_after_day,
        ];
        !totals.iter().all(|v| v.is_finite())
            || !day
                .bets
                .iter()
                .all(|b| b.stake.is_finite() && b.potential_win.is_finite())
    });

    match overflowed {
        Some(day) => Err(ValidationError::Overflow(day.day)),
        None => Ok(()),
    }
}
