//! SQLite storage implementation.
//!
//! This module provides the relational backend behind the REST API. Every
//! operation is a single statement except [`SqliteStorage::bulk_replace_items`],
//! which runs inside one transaction via [`SqliteStorage::mutate`].

use crate::error::Result;
use crate::model::{ItemId, LineItem};
use crate::storage::schema::apply_schema;
use rusqlite::{Connection, OptionalExtension, Transaction};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// How long a write waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

/// An item row as stored, including its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredItem {
    pub id: ItemId,
    pub quantity: String,
    pub price: String,
    pub position: i64,
}

impl SqliteStorage {
    /// Open a database at the given path.
    ///
    /// Creates the database, its parent directory and the schema if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Get a reference to the underlying connection (for read operations).
    #[must_use]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` inside an IMMEDIATE transaction.
    ///
    /// Commits when `f` returns `Ok`; any error drops the transaction, which
    /// rolls it back.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or an error from begin/commit.
    pub fn mutate<F, R>(&mut self, op: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

        debug!(op, "begin");
        let result = f(&tx)?;
        tx.commit()?;
        debug!(op, "commit");

        Ok(result)
    }

    // ==================
    // Budget Operations
    // ==================

    /// Current budget cap, `0` if the row or value is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_budget(&self) -> Result<f64> {
        let budget: Option<Option<f64>> = self
            .conn
            .query_row(
                "SELECT max_budget FROM shopping_data WHERE id = 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(budget.flatten().unwrap_or(0.0))
    }

    /// Overwrite the budget cap. Returns the number of rows changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_budget(&mut self, max_budget: f64) -> Result<usize> {
        let changed = self.conn.execute(
            "UPDATE shopping_data SET max_budget = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = 1",
            [max_budget],
        )?;
        debug!(max_budget, changed, "budget updated");
        Ok(changed)
    }

    // ==================
    // Item Operations
    // ==================

    /// All items in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_items(&self) -> Result<Vec<StoredItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, quantity, price, position FROM shopping_items ORDER BY position ASC, id ASC",
        )?;

        let rows = stmt
            .query_map([], map_item_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Append an item after the current last position. Returns its new id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn add_item(&mut self, quantity: &str, price: &str) -> Result<ItemId> {
        self.conn.execute(
            "INSERT INTO shopping_items (quantity, price, position)
             SELECT ?1, ?2, COALESCE(MAX(position), -1) + 1 FROM shopping_items",
            [quantity, price],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, "item added");
        Ok(id)
    }

    /// Update an item's fields. Returns rows changed (0 if the id is unknown).
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_item(&mut self, id: ItemId, quantity: &str, price: &str) -> Result<usize> {
        let changed = self.conn.execute(
            "UPDATE shopping_items SET quantity = ?1, price = ?2, updated_at = CURRENT_TIMESTAMP
             WHERE id = ?3",
            rusqlite::params![quantity, price, id],
        )?;
        debug!(id, changed, "item updated");
        Ok(changed)
    }

    /// Delete an item. Returns rows changed; deleting a missing id yields 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_item(&mut self, id: ItemId) -> Result<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM shopping_items WHERE id = ?1", [id])?;
        debug!(id, changed, "item deleted");
        Ok(changed)
    }

    /// Replace every item with `items`, positioned `0..n-1` in slice order.
    ///
    /// Ids on the incoming items are ignored; rows get fresh ids. Runs as a
    /// single transaction, so a failure leaves the previous list intact.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails.
    pub fn bulk_replace_items(&mut self, items: &[LineItem]) -> Result<()> {
        self.mutate("bulk_replace_items", |tx| {
            tx.execute("DELETE FROM shopping_items", [])?;

            let mut stmt = tx.prepare(
                "INSERT INTO shopping_items (quantity, price, position) VALUES (?1, ?2, ?3)",
            )?;
            for (position, item) in (0_i64..).zip(items) {
                stmt.execute(rusqlite::params![item.quantity, item.price, position])?;
            }

            debug!(count = items.len(), "items replaced");
            Ok(())
        })
    }
}

fn map_item_row(row: &rusqlite::Row) -> rusqlite::Result<StoredItem> {
    Ok(StoredItem {
        id: row.get(0)?,
        quantity: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        price: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        position: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(rows: &[StoredItem]) -> Vec<(String, String, i64)> {
        rows.iter()
            .map(|r| (r.quantity.clone(), r.price.clone(), r.position))
            .collect()
    }

    #[test]
    fn test_open_memory() {
        let storage = SqliteStorage::open_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_open_file_creates_dir_and_keeps_data() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("data").join("shopping.db");

        let mut storage = SqliteStorage::open(&path).unwrap();
        let timeout: i64 = storage
            .conn()
            .query_row("PRAGMA busy_timeout", [], |row| row.get(0))
            .unwrap();
        assert_eq!(timeout, 5000);
        storage.add_item("2", "3.00").unwrap();
        drop(storage);

        let reopened = SqliteStorage::open(&path).unwrap();
        assert_eq!(
            values(&reopened.get_items().unwrap()),
            vec![("2".to_string(), "3.00".to_string(), 0)]
        );
    }

    #[test]
    fn test_budget_defaults_and_updates() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        assert_eq!(storage.get_budget().unwrap(), 0.0);

        assert_eq!(storage.update_budget(42.5).unwrap(), 1);
        assert_eq!(storage.get_budget().unwrap(), 42.5);
    }

    #[test]
    fn test_budget_missing_row_reads_zero() {
        let storage = SqliteStorage::open_memory().unwrap();
        storage
            .conn()
            .execute("DELETE FROM shopping_data", [])
            .unwrap();
        assert_eq!(storage.get_budget().unwrap(), 0.0);
    }

    #[test]
    fn test_item_crud() {
        let mut storage = SqliteStorage::open_memory().unwrap();

        // Create
        let first = storage.add_item("1", "").unwrap();
        let second = storage.add_item("2", "3.00").unwrap();
        assert_ne!(first, second);

        // Read
        let items = storage.get_items().unwrap();
        assert_eq!(
            values(&items),
            vec![("1".into(), String::new(), 0), ("2".into(), "3.00".into(), 1)]
        );

        // Update
        assert_eq!(storage.update_item(first, "4", "0.99").unwrap(), 1);
        let items = storage.get_items().unwrap();
        assert_eq!(items[0].quantity, "4");
        assert_eq!(items[0].price, "0.99");

        // Delete
        assert_eq!(storage.delete_item(first).unwrap(), 1);
        let items = storage.get_items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, second);
    }

    #[test]
    fn test_positions_tolerate_gaps() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.add_item("1", "1").unwrap();
        let middle = storage.add_item("1", "2").unwrap();
        storage.add_item("1", "3").unwrap();
        storage.delete_item(middle).unwrap();

        storage.add_item("1", "4").unwrap();
        let positions: Vec<i64> = storage
            .get_items()
            .unwrap()
            .iter()
            .map(|r| r.position)
            .collect();
        assert_eq!(positions, vec![0, 2, 3]);
    }

    #[test]
    fn test_missing_ids_are_not_errors() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        assert_eq!(storage.delete_item(999).unwrap(), 0);
        assert_eq!(storage.update_item(999, "1", "1").unwrap(), 0);
    }

    #[test]
    fn test_bulk_replace_normalizes_positions() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.add_item("9", "9").unwrap();

        let list = vec![
            LineItem::new("2", "1.50"),
            LineItem::new("1", "").with_id(77),
            LineItem::new("3", "0.25"),
        ];
        storage.bulk_replace_items(&list).unwrap();

        let items = storage.get_items().unwrap();
        assert_eq!(
            values(&items),
            vec![
                ("2".into(), "1.50".into(), 0),
                ("1".into(), String::new(), 1),
                ("3".into(), "0.25".into(), 2),
            ]
        );
        assert!(items.iter().all(|r| r.id != 77));
    }

    #[test]
    fn test_bulk_replace_with_empty_list() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.add_item("1", "1").unwrap();
        storage.bulk_replace_items(&[]).unwrap();
        assert!(storage.get_items().unwrap().is_empty());
    }

    #[test]
    fn test_failed_mutation_rolls_back() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.add_item("1", "1").unwrap();

        let result: Result<()> = storage.mutate("doomed", |tx| {
            tx.execute("DELETE FROM shopping_items", [])?;
            Err(crate::error::Error::Other("boom".into()))
        });
        assert!(result.is_err());
        assert_eq!(storage.get_items().unwrap().len(), 1);
    }
}
