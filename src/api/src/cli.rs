//! CLI commands for bankroll-api.
//!
//! Supports API server mode and offline plan projection/statistics.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::plan::{generate_plan, DayResult};
use crate::stats::{print_stats_table, PlanStats};
use crate::types::{ConfigInput, PlanState};
use crate::validation::{validate_config, validate_plan};

#[derive(Parser)]
#[command(name = "bankroll-api")]
#[command(version, about = "Bankroll planner: compounding bet schedules API and CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },

    /// Project a plan from a strategy JSON file
    Plan {
        /// Path to strategy JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// Starting balance override (defaults to the strategy's initial budget)
        #[arg(short, long)]
        budget: Option<f64>,
    },

    /// Summarize a stored plan JSON file ({config, plan})
    Stats {
        /// Path to plan state JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },
}

/// Generate a plan from a strategy file and print it.
pub fn run_plan(input: PathBuf, format: String, budget: Option<f64>) -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    let input_json = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let strategy: ConfigInput = serde_json::from_str(&input_json)?;
    let mut betting = config.defaults.resolve(strategy);
    if let Some(budget) = budget {
        betting.initial_budget = budget;
    }
    validate_config(&betting)?;

    let plan = generate_plan(&betting, betting.initial_budget);
    validate_plan(&plan)?;
    eprintln!("Projected {} days", plan.len());

    match format.as_str() {
        "table" => print_plan_table(&plan),
        _ => println!("{}", serde_json::to_string_pretty(&PlanState::new(betting, plan))?),
    }

    Ok(())
}

/// Read a stored plan state and print its statistics.
pub fn run_stats(input: PathBuf, format: String) -> anyhow::Result<()> {
    let input_json = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let state: PlanState = serde_json::from_str(&input_json)?;

    let stats = PlanStats::from_plan(&state.plan, &state.config);
    match format.as_str() {
        "table" => print_stats_table(&stats),
        _ => println!("{}", serde_json::to_string_pretty(&stats)?),
    }

    Ok(())
}

/// Print a plan as a day-by-day table.
pub fn print_plan_table(plan: &[DayResult]) {
    println!(
        "  {:>4} {:10} {:>5} {:>12} {:>10} {:>12} {:>12} {:>9}",
        "Day", "Date", "Bets", "Balance", "Stake", "Pot. Win", "After", "Status"
    );
    println!("  {}", "-".repeat(84));
    for day in plan {
        println!(
            "  {:>4} {:10} {:>5} {:>12.2} {:>10.2} {:>12.2} {:>12.2} {:>9}",
            day.day,
            day.date.to_string(),
            day.bets.len(),
            day.current_balance,
            day.total_stake,
            day.total_potential_win,
            day.balance_after_day,
            if day.is_completed() { "completed" } else { "pending" }
        );
    }
}
