//! One-time move of local-storage data into the server.
//!
//! Before the server backend existed, the whole list lived in a local
//! snapshot. On startup against a server, any such snapshot that still holds
//! items is replayed with one bulk replace plus a budget save, then erased.
//! Once erased, later startups find nothing and do nothing.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::model::{Snapshot, SNAPSHOT_KEY};
use crate::persistence::{KeyValueStore, Persistence};

/// What a migration run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationOutcome {
    pub migrated: bool,
    pub items: usize,
    pub max_budget: Option<f64>,
}

/// Replay the legacy snapshot in `legacy` into `target`, then remove it.
///
/// A missing snapshot, or one without items, is left alone. The legacy copy
/// is only removed after both writes succeeded, so a failed run is retried on
/// the next startup.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be read or parsed, or if any write
/// to `target` or the removal fails.
pub async fn migrate_legacy<K, P>(legacy: &K, target: &P) -> Result<MigrationOutcome>
where
    K: KeyValueStore,
    P: Persistence,
{
    let Some(raw) = legacy.get(SNAPSHOT_KEY)? else {
        debug!("no legacy snapshot");
        return Ok(MigrationOutcome::default());
    };

    let snapshot: Snapshot = serde_json::from_str(&raw)?;
    if snapshot.items.is_empty() {
        debug!("legacy snapshot has no items; leaving it");
        return Ok(MigrationOutcome::default());
    }

    info!(
        items = snapshot.items.len(),
        backend = target.backend().as_str(),
        "migrating legacy snapshot"
    );
    target.bulk_replace_items(&snapshot.items).await?;
    if let Some(max_budget) = snapshot.max_budget {
        target.save_budget(max_budget).await?;
    }

    legacy.remove(SNAPSHOT_KEY)?;
    info!("migration complete");

    Ok(MigrationOutcome {
        migrated: true,
        items: snapshot.items.len(),
        max_budget: snapshot.max_budget,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LineItem;
    use crate::persistence::{LocalPersistence, MemoryStore};

    fn legacy_with(raw: &str) -> MemoryStore {
        let store = MemoryStore::new();
        store.set(SNAPSHOT_KEY, raw).unwrap();
        store
    }

    #[tokio::test]
    async fn test_migrates_once() {
        let legacy = legacy_with(r#"{"maxBudget":50,"items":[{"quantity":"2","price":"1.50"}]}"#);
        let target = LocalPersistence::new(MemoryStore::new());

        let outcome = migrate_legacy(&legacy, &target).await.unwrap();
        assert!(outcome.migrated);
        assert_eq!(outcome.items, 1);

        assert_eq!(target.load_budget().await.unwrap(), 50.0);
        let items = target.load_items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].same_values(&LineItem::new("2", "1.50")));
        assert_eq!(legacy.get(SNAPSHOT_KEY).unwrap(), None);

        let again = migrate_legacy(&legacy, &target).await.unwrap();
        assert_eq!(again, MigrationOutcome::default());
        assert_eq!(target.load_items().await.unwrap(), items);
    }

    #[tokio::test]
    async fn test_empty_snapshot_is_left_alone() {
        let legacy = legacy_with(r#"{"maxBudget":20,"items":[]}"#);
        let target = LocalPersistence::new(MemoryStore::new());
        target.save_budget(5.0).await.unwrap();

        let outcome = migrate_legacy(&legacy, &target).await.unwrap();
        assert!(!outcome.migrated);
        assert_eq!(target.load_budget().await.unwrap(), 5.0);
        assert!(legacy.get(SNAPSHOT_KEY).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_missing_budget_keeps_target_budget() {
        let legacy = legacy_with(r#"{"items":[{"quantity":1,"price":"3"}]}"#);
        let target = LocalPersistence::new(MemoryStore::new());
        target.save_budget(8.0).await.unwrap();

        let outcome = migrate_legacy(&legacy, &target).await.unwrap();
        assert!(outcome.migrated);
        assert_eq!(outcome.max_budget, None);
        assert_eq!(target.load_budget().await.unwrap(), 8.0);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_an_error_and_kept() {
        let legacy = legacy_with("{not json");
        let target = LocalPersistence::new(MemoryStore::new());
        assert!(migrate_legacy(&legacy, &target).await.is_err());
        assert!(legacy.get(SNAPSHOT_KEY).unwrap().is_some());
    }
}
