//! SQLite repository for CRUD operations on stored plans

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::schema::create_tables;
use crate::types::{PlanState, SavedPlanSummary};

/// Which working plan of an owner is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanSlot {
    Active,
    /// Sandbox copy for trying edits without touching the active plan
    Simulation,
}

impl PlanSlot {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(PlanSlot::Active),
            "simulation" => Some(PlanSlot::Simulation),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlanSlot::Active => "active",
            PlanSlot::Simulation => "simulation",
        }
    }
}

/// Repository for plan state
pub struct PlanRepository {
    conn: Connection,
}

impl PlanRepository {
    /// Create a new repository, initializing the database if needed
    pub fn new(db_path: &Path) -> Result<Self> {
        // Create parent directories if needed
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create database directory")?;
        }

        let conn = Connection::open(db_path)
            .context("Failed to open database")?;

        // Create tables if they don't exist
        create_tables(&conn)?;

        Ok(Self { conn })
    }

    /// Create an in-memory repository (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        create_tables(&conn)?;
        Ok(Self { conn })
    }

    // ==================== Working Plans ====================

    /// Store a plan for an owner and slot (upsert)
    pub fn upsert_plan(&self, owner_id: &str, slot: PlanSlot, state: &PlanState) -> Result<()> {
        let (config, plan) = encode_state(state)?;
        self.conn.execute(
            r#"
            INSERT OR REPLACE INTO plans
            (owner_id, slot, config, plan, current_balance, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, datetime('now'))
            "#,
            params![owner_id, slot.name(), config, plan, state.current_balance],
        )?;
        Ok(())
    }

    /// Load the plan stored for an owner and slot
    pub fn get_plan(&self, owner_id: &str, slot: PlanSlot) -> Result<Option<PlanState>> {
        let row = self
            .conn
            .query_row(
                "SELECT config, plan, current_balance FROM plans WHERE owner_id = ?1 AND slot = ?2",
                params![owner_id, slot.name()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        row.map(decode_state).transpose()
    }

    /// Remove the plan for an owner and slot. Returns whether one existed.
    pub fn delete_plan(&self, owner_id: &str, slot: PlanSlot) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM plans WHERE owner_id = ?1 AND slot = ?2",
            params![owner_id, slot.name()],
        )?;
        Ok(deleted > 0)
    }

    // ==================== Saved Plans ====================

    /// Save a named snapshot, replacing any snapshot with the same name
    pub fn save_named(&self, owner_id: &str, name: &str, state: &PlanState) -> Result<i64> {
        let (config, plan) = encode_state(state)?;
        self.conn.execute(
            r#"
            INSERT INTO saved_plans (owner_id, name, config, plan, current_balance)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(owner_id, name) DO UPDATE SET
                config = excluded.config,
                plan = excluded.plan,
                current_balance = excluded.current_balance,
                created_at = datetime('now')
            "#,
            params![owner_id, name, config, plan, state.current_balance],
        )?;

        let id = self.conn.query_row(
            "SELECT id FROM saved_plans WHERE owner_id = ?1 AND name = ?2",
            params![owner_id, name],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// List an owner's saved plans, oldest first
    pub fn list_saved(&self, owner_id: &str) -> Result<Vec<SavedPlanSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, created_at
            FROM saved_plans
            WHERE owner_id = ?1
            ORDER BY created_at, id
            "#,
        )?;

        let rows = stmt.query_map([owner_id], |row| {
            Ok(SavedPlanSummary {
                id: row.get(0)?,
                name: row.get(1)?,
                created_at: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            })
        })?;

        let mut saved = Vec::new();
        for row in rows {
            saved.push(row?);
        }
        Ok(saved)
    }

    /// Load a saved plan by id
    pub fn get_saved(&self, owner_id: &str, id: i64) -> Result<Option<PlanState>> {
        let row = self
            .conn
            .query_row(
                "SELECT config, plan, current_balance FROM saved_plans WHERE owner_id = ?1 AND id = ?2",
                params![owner_id, id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        row.map(decode_state).transpose()
    }

    /// Delete a saved plan. Returns whether one existed.
    pub fn delete_saved(&self, owner_id: &str, id: i64) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM saved_plans WHERE owner_id = ?1 AND id = ?2",
            params![owner_id, id],
        )?;
        Ok(deleted > 0)
    }

    /// Number of saved plans an owner keeps
    pub fn count_saved(&self, owner_id: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM saved_plans WHERE owner_id = ?1",
            [owner_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Check if an owner already has a saved plan with this name
    pub fn saved_name_exists(&self, owner_id: &str, name: &str) -> Result<bool> {
        let count: i32 = self.conn.query_row(
            "SELECT COUNT(*) FROM saved_plans WHERE owner_id = ?1 AND name = ?2",
            params![owner_id, name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

fn encode_state(state: &PlanState) -> Result<(String, String)> {
    let config = serde_json::to_string(&state.config).context("Failed to encode config")?;
    let plan = serde_json::to_string(&state.plan).context("Failed to encode plan")?;
    Ok((config, plan))
}

fn decode_state((config, plan, current_balance): (String, String, f64)) -> Result<PlanState> {
    Ok(PlanState {
        config: serde_json::from_str(&config).context("Failed to decode stored config")?,
        plan: serde_json::from_str(&plan).context("Failed to decode stored plan")?,
        current_balance,
    })
}
