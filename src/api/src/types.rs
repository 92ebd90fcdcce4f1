//! Request and response types for the bankroll API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::plan::{current_balance, BettingConfig, DayResult};

/// Strategy as submitted by a client. Missing strategy fields fall back to
/// the configured defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInput {
    pub initial_budget: f64,
    #[serde(default)]
    pub odds: Option<f64>,
    #[serde(default)]
    pub reinvestment_percentage: Option<f64>,
    #[serde(default)]
    pub bets_per_day: Option<u32>,
    #[serde(default)]
    pub stake_percentage: Option<f64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Persisted state for one plan: strategy, schedule and realized balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanState {
    pub config: BettingConfig,
    pub plan: Vec<DayResult>,
    #[serde(default)]
    pub current_balance: f64,
}

impl PlanState {
    pub fn new(config: BettingConfig, plan: Vec<DayResult>) -> Self {
        let current_balance = current_balance(&plan, &config);
        Self {
            config,
            plan,
            current_balance,
        }
    }
}

/// Bankroll injection request
#[derive(Debug, Deserialize)]
pub struct BankrollRequest {
    pub amount: f64,
}

/// Save-plan request
#[derive(Debug, Deserialize)]
pub struct SavePlanRequest {
    pub name: String,
}

/// Saved plan listing entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPlanSummary {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
