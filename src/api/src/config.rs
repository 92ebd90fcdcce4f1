//! Configuration for the bankroll API.

use serde::{Deserialize, Serialize};

use crate::plan::BettingConfig;
use crate::types::ConfigInput;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: String,
}

fn default_storage_path() -> String {
    "data/bankroll.db".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

/// Per-owner limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Named plans an owner may keep
    #[serde(default = "default_max_saved_plans")]
    pub max_saved_plans: usize,
}

fn default_max_saved_plans() -> usize {
    5
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_saved_plans: default_max_saved_plans(),
        }
    }
}

/// Strategy values used when a request leaves them out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyDefaults {
    #[serde(default = "default_odds")]
    pub odds: f64,
    #[serde(default = "default_reinvestment_percentage")]
    pub reinvestment_percentage: f64,
    #[serde(default = "default_bets_per_day")]
    pub bets_per_day: u32,
    #[serde(default = "default_stake_percentage")]
    pub stake_percentage: f64,
}

fn default_odds() -> f64 {
    1.5
}

fn default_reinvestment_percentage() -> f64 {
    100.0
}

fn default_bets_per_day() -> u32 {
    1
}

fn default_stake_percentage() -> f64 {
    10.0
}

impl Default for StrategyDefaults {
    fn default() -> Self {
        Self {
            odds: default_odds(),
            reinvestment_percentage: default_reinvestment_percentage(),
            bets_per_day: default_bets_per_day(),
            stake_percentage: default_stake_percentage(),
        }
    }
}

impl StrategyDefaults {
    /// Fill the optional strategy fields of `input`.
    pub fn resolve(&self, input: ConfigInput) -> BettingConfig {
        BettingConfig {
            initial_budget: input.initial_budget,
            odds: input.odds.unwrap_or(self.odds),
            reinvestment_percentage: input
                .reinvestment_percentage
                .unwrap_or(self.reinvestment_percentage),
            bets_per_day: input.bets_per_day.unwrap_or(self.bets_per_day),
            stake_percentage: input.stake_percentage.unwrap_or(self.stake_percentage),
            start_date: input.start_date,
            end_date: input.end_date,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub defaults: StrategyDefaults,
}

impl AppConfig {
    /// Load configuration from environment and config file
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Add config file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (BANKROLL_SERVER__PORT, BANKROLL_LIMITS__MAX_SAVED_PLANS, etc.)
            .add_source(
                config::Environment::with_prefix("BANKROLL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.path, "data/bankroll.db");
        assert_eq!(config.limits.max_saved_plans, 5);
        assert_eq!(config.defaults.bets_per_day, 1);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"limits": {"max_saved_plans": 2}}"#).unwrap();
        assert_eq!(config.limits.max_saved_plans, 2);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.defaults.stake_percentage, 10.0);
    }

    #[test]
    fn test_resolve_fills_missing_fields() {
        let defaults = StrategyDefaults::default();
        let input = ConfigInput {
            initial_budget: 250.0,
            odds: Some(1.9),
            reinvestment_percentage: None,
            bets_per_day: Some(3),
            stake_percentage: None,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
        };

        let config = defaults.resolve(input);

        assert_eq!(config.initial_budget, 250.0);
        assert_eq!(config.odds, 1.9);
        assert_eq!(config.reinvestment_percentage, 100.0);
        assert_eq!(config.bets_per_day, 3);
        assert_eq!(config.stake_percentage, 10.0);
    }
}
