//! Database schema definitions.
//!
//! Two tables: a single-row budget record and the ordered item list.

use rusqlite::{Connection, Result};

/// Current schema version for migration tracking.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The complete SQL schema for the kishop database.
///
/// Note: `updated_at` is stored as TEXT (`YYYY-MM-DD HH:MM:SS`, UTC), the
/// format SQLite's `CURRENT_TIMESTAMP` produces.
pub const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at INTEGER NOT NULL
);

-- Budget: exactly one row, id 1
CREATE TABLE IF NOT EXISTS shopping_data (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    max_budget REAL DEFAULT 0,
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

-- Items: display order is ascending position
CREATE TABLE IF NOT EXISTS shopping_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    quantity TEXT NOT NULL DEFAULT '1',
    price TEXT DEFAULT '',
    position INTEGER NOT NULL,
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_shopping_items_position ON shopping_items(position);
";

/// Apply the schema and seed the budget row.
///
/// Safe to call on every open.
///
/// # Errors
///
/// Returns an error if any statement fails.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    // In-memory databases ignore WAL and report "memory"; that is fine.
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;

    conn.execute_batch(SCHEMA_SQL)?;

    conn.execute(
        "INSERT OR IGNORE INTO shopping_data (id, max_budget) VALUES (1, 0)",
        [],
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
        rusqlite::params![
            format!("v{CURRENT_SCHEMA_VERSION}"),
            chrono::Utc::now().timestamp_millis()
        ],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_applies_cleanly() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).expect("Schema should apply");
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).expect("First apply failed");
        apply_schema(&conn).expect("Second apply failed");

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM shopping_data", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_budget_singleton_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO shopping_data (id, max_budget) VALUES (2, 10)",
            [],
        );
        assert!(result.is_err());
    }
}
