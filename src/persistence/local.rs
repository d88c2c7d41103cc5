//! Local backend: the whole app state as one JSON snapshot.
//!
//! There are no partial writes. Each operation reads the snapshot, changes it
//! and writes all of it back under [`SNAPSHOT_KEY`].

use std::sync::Mutex;

use tracing::debug;

use super::kv::KeyValueStore;
use super::{Backend, Persistence};
use crate::error::{Error, Result};
use crate::model::{ItemId, LineItem, Snapshot, SNAPSHOT_KEY};

/// [`Persistence`] over a [`KeyValueStore`].
#[derive(Debug)]
pub struct LocalPersistence<K> {
    kv: K,
    /// Serialises read-modify-write cycles within this process.
    guard: Mutex<()>,
}

impl<K: KeyValueStore> LocalPersistence<K> {
    pub fn new(kv: K) -> Self {
        Self {
            kv,
            guard: Mutex::new(()),
        }
    }

    /// The underlying key/value store.
    pub fn store(&self) -> &K {
        &self.kv
    }

    /// Current snapshot, empty if nothing was ever saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the blob is not valid JSON.
    pub fn read_snapshot(&self) -> Result<Snapshot> {
        match self.kv.get(SNAPSHOT_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Snapshot::default()),
        }
    }

    /// Apply `f` to the snapshot and write it back if anything changed.
    ///
    /// Rows written by older versions get ids before `f` sees them.
    fn with_snapshot<R>(&self, op: &str, f: impl FnOnce(&mut Snapshot) -> R) -> Result<R> {
        let _lock = self
            .guard
            .lock()
            .map_err(|_| Error::Other("local store lock poisoned".into()))?;

        let mut snapshot = self.read_snapshot()?;
        let before = snapshot.clone();

        snapshot.assign_missing_ids();
        let result = f(&mut snapshot);

        if snapshot != before {
            let raw = serde_json::to_string(&snapshot)?;
            self.kv.set(SNAPSHOT_KEY, &raw)?;
            debug!(op, items = snapshot.items.len(), "snapshot written");
        }

        Ok(result)
    }
}

impl<K: KeyValueStore> Persistence for LocalPersistence<K> {
    fn backend(&self) -> Backend {
        Backend::Local
    }

    async fn load_budget(&self) -> Result<f64> {
        Ok(self.read_snapshot()?.max_budget.unwrap_or(0.0))
    }

    async fn save_budget(&self, max_budget: f64) -> Result<()> {
        self.with_snapshot("save_budget", |s| s.max_budget = Some(max_budget))
    }

    async fn load_items(&self) -> Result<Vec<LineItem>> {
        self.with_snapshot("load_items", |s| s.items.clone())
    }

    async fn add_item(&self, item: &LineItem) -> Result<ItemId> {
        self.with_snapshot("add_item", |s| {
            let id = s.allocate_id();
            s.items.push(item.clone().with_id(id));
            id
        })
    }

    async fn update_item(&self, id: ItemId, item: &LineItem) -> Result<()> {
        self.with_snapshot("update_item", |s| {
            if let Some(stored) = s.items.iter_mut().find(|i| i.id == Some(id)) {
                stored.quantity.clone_from(&item.quantity);
                stored.price.clone_from(&item.price);
            }
        })
    }

    async fn delete_item(&self, id: ItemId) -> Result<()> {
        self.with_snapshot("delete_item", |s| s.items.retain(|i| i.id != Some(id)))
    }

    async fn bulk_replace_items(&self, items: &[LineItem]) -> Result<()> {
        self.with_snapshot("bulk_replace_items", |s| {
            s.items.clear();
            for item in items {
                let id = s.allocate_id();
                s.items.push(LineItem::new(item.quantity.clone(), item.price.clone()).with_id(id));
            }
        })
    }
}
