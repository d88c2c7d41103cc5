//! Whole-application snapshot kept in local key/value storage.
//!
//! The format predates the server backend, so it must keep reading blobs
//! written as `{"maxBudget": ..., "items": [{"quantity": ..., "price": ...}]}`.

use serde::{Deserialize, Serialize};

use super::item::{ItemId, LineItem};
use super::numeric::lenient_f64_opt;

/// Well-known key the snapshot lives under.
pub const SNAPSHOT_KEY: &str = "kishop_data";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// `None` when the blob never recorded a budget.
    #[serde(
        default,
        deserialize_with = "lenient_f64_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_budget: Option<f64>,

    #[serde(default)]
    pub items: Vec<LineItem>,

    /// Next id handed out by the local store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_id: Option<ItemId>,
}

impl Snapshot {
    /// Give every id-less item an id. Returns true if anything changed.
    pub fn assign_missing_ids(&mut self) -> bool {
        let mut next = self.next_id_floor();
        let mut changed = false;
        for item in &mut self.items {
            if item.id.is_none() {
                item.id = Some(next);
                next += 1;
                changed = true;
            }
        }
        if changed {
            self.next_id = Some(next);
        }
        changed
    }

    /// Reserve and return a fresh id.
    pub fn allocate_id(&mut self) -> ItemId {
        let id = self.next_id_floor();
        self.next_id = Some(id + 1);
        id
    }

    /// Smallest id not yet used by any item or previously handed out.
    fn next_id_floor(&self) -> ItemId {
        let max_seen = self.items.iter().filter_map(|i| i.id).max().unwrap_or(0);
        self.next_id.unwrap_or(1).max(max_seen + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_legacy_blob() {
        let snap: Snapshot = serde_json::from_str(
            r#"{"maxBudget":"50","items":[{"quantity":"2","price":"1.50"},{"quantity":1,"price":""}]}"#,
        )
        .unwrap();
        assert_eq!(snap.max_budget, Some(50.0));
        assert_eq!(snap.items.len(), 2);
        assert_eq!(snap.items[1].quantity, "1");
        assert!(snap.next_id.is_none());
    }

    #[test]
    fn test_assign_missing_ids() {
        let mut snap = Snapshot {
            max_budget: None,
            items: vec![LineItem::new("1", "2").with_id(4), LineItem::blank()],
            next_id: None,
        };
        assert!(snap.assign_missing_ids());
        assert_eq!(snap.items[1].id, Some(5));
        assert_eq!(snap.allocate_id(), 6);
        assert!(!snap.assign_missing_ids());
    }
}
