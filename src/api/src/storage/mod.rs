//! SQLite storage module for bankroll plans
//!
//! Persists each owner's `(config, plan, currentBalance)` as JSON blobs,
//! keyed by owner and slot, plus named saved snapshots.

pub mod repository;
pub mod schema;

pub use repository::{PlanRepository, PlanSlot};
