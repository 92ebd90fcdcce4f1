//! SQLite schema definitions for stored plans
//!
//! Tables:
//! - plans: Current plan per owner and slot (active or simulation)
//! - saved_plans: Named snapshots an owner keeps for later

use rusqlite::{Connection, Result};

/// Create all tables in the database
pub fn create_tables(conn: &Connection) -> Result<()> {
    // Working plans, one per owner and slot
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS plans (
            owner_id TEXT NOT NULL,
            slot TEXT NOT NULL,
            config TEXT NOT NULL,
            plan TEXT NOT NULL,
            current_balance REAL NOT NULL,
            updated_at TEXT DEFAULT (datetime('now')),
            PRIMARY KEY (owner_id, slot)
        )
        "#,
        [],
    )?;

    // Named snapshots
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS saved_plans (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner_id TEXT NOT NULL,
            name TEXT NOT NULL,
            config TEXT NOT NULL,
            plan TEXT NOT NULL,
            current_balance REAL NOT NULL,
            created_at TEXT DEFAULT (datetime('now')),
            UNIQUE(owner_id, name)
        )
        "#,
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_saved_plans_owner ON saved_plans(owner_id)",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_create_tables() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        // Verify tables exist
        let count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN
                 ('plans', 'saved_plans')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_create_tables_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        // Should not fail on second call
        create_tables(&conn).unwrap();
    }
}
