//! Plan summary statistics.
//!
//! Realized figures only count resolved bets; projections come from the
//! plan's closing balance.

use serde::Serialize;

use crate::plan::{current_balance, BetOutcome, BettingConfig, DayResult};

/// Aggregate view over a plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStats {
    pub total_days: usize,
    pub completed_days: usize,
    pub pending_days: usize,
    pub total_bets: usize,
    pub num_wins: usize,
    pub num_losses: usize,
    pub num_unresolved: usize,
    /// Stake placed on resolved bets
    pub total_staked: f64,
    /// Payout collected from winning bets
    pub total_return: f64,
    pub profit: f64,
    pub roi: f64,
    pub hit_rate: f64,
    pub max_drawdown: f64,
    pub current_balance: f64,
    pub projected_balance: f64,
}

impl PlanStats {
    pub fn from_plan(plan: &[DayResult], config: &BettingConfig) -> Self {
        let mut stats = PlanStats {
            total_days: plan.len(),
            current_balance: current_balance(plan, config),
            ..Default::default()
        };

        // Realized profit curve, walked bet by bet in plan order
        let mut cumulative = 0.0;
        let mut peak = 0.0;

        for day in plan {
            if day.is_completed() {
                stats.completed_days += 1;
            }

            for bet in &day.bets {
                stats.total_bets += 1;
                match bet.result {
                    Some(BetOutcome::Win) => {
                        stats.num_wins += 1;
                        stats.total_return += bet.potential_win;
                    }
                    Some(BetOutcome::Lose) => stats.num_losses += 1,
                    None => {
                        stats.num_unresolved += 1;
                        continue;
                    }
                }
                stats.total_staked += bet.stake;

                cumulative += bet.resolved_profit().unwrap_or(0.0);
                if cumulative > peak {
                    peak = cumulative;
                }
                let drawdown = peak - cumulative;
                if drawdown > stats.max_drawdown {
                    stats.max_drawdown = drawdown;
                }
            }
        }

        stats.pending_days = stats.total_days - stats.completed_days;
        stats.profit = stats.total_return - stats.total_staked;
        stats.roi = if stats.total_staked > 0.0 {
            stats.profit / stats.total_staked
        } else {
            0.0
        };
        let resolved = stats.num_wins + stats.num_losses;
        stats.hit_rate = if resolved > 0 {
            stats.num_wins as f64 / resolved as f64
        } else {
            0.0
        };
        stats.projected_balance = plan
            .last()
            .map(|d| d.balance_after_day)
            .unwrap_or(stats.current_balance);

        stats
    }
}

/// Print statistics as a table.
pub fn print_stats_table(stats: &PlanStats) {
    println!("=== Plan Statistics ===");
    println!();
    println!("Days:");
    println!("  Total:         {}", stats.total_days);
    println!("  Completed:     {}", stats.completed_days);
    println!("  Pending:       {}", stats.pending_days);
    println!();
    println!("Bets:");
    println!("  Total:         {}", stats.total_bets);
    println!("  Wins:          {}", stats.num_wins);
    println!("  Losses:        {}", stats.num_losses);
    println!("  Unresolved:    {}", stats.num_unresolved);
    println!("  Hit Rate:      {:.2}%", stats.hit_rate * 100.0);
    println!();
    println!("Money:");
    println!("  Total Staked:  {:.2}", stats.total_staked);
    println!("  Total Return:  {:.2}", stats.total_return);
    println!("  Profit:        {:.2}", stats.profit);
    println!("  ROI:           {:.2}%", stats.roi * 100.0);
    println!("  Max Drawdown:  {:.2}", stats.max_drawdown);
    println!("  Balance:       {:.2}", stats.current_balance);
    println!("  Projected:     {:.2}", stats.projected_balance);
}
