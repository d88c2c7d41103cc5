//! The shopping list state manager.
//!
//! [`ShoppingList`] owns the in-memory rows and the budget and mirrors every
//! change into a [`Persistence`] store. The in-memory state is always updated
//! first; store writes are best-effort and their failures go to a
//! [`FailureSink`] rather than back to the caller. Only loading can fail a
//! call, because without a load there is nothing to edit.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::{ItemField, ItemId, LineItem};
use crate::persistence::{FailureSink, LogSink, Persistence, WriteFailure, WriteOp};
use crate::totals::{compute_totals, QuantityPolicy, Totals};

/// Behaviour switches that differ between deployments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListPolicy {
    /// Which rows count toward the unit total.
    pub quantity_policy: QuantityPolicy,
    /// Sort rows by completeness whenever an edit is committed.
    pub reorder_on_commit: bool,
}

/// Ordered line items plus the budget, backed by a store.
pub struct ShoppingList<P> {
    items: Vec<LineItem>,
    max_budget: f64,
    store: P,
    policy: ListPolicy,
    sink: Arc<dyn FailureSink>,
}

impl<P: Persistence> ShoppingList<P> {
    /// Load budget and items from `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if either read fails.
    pub async fn load(store: P, policy: ListPolicy) -> Result<Self> {
        let mut list = Self {
            items: Vec::new(),
            max_budget: 0.0,
            store,
            policy,
            sink: Arc::new(LogSink),
        };
        list.refresh().await?;
        Ok(list)
    }

    /// Route best-effort write failures to `sink` instead of the log.
    #[must_use]
    pub fn with_failure_sink(mut self, sink: Arc<dyn FailureSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Re-read budget and items from the store, discarding local state.
    ///
    /// # Errors
    ///
    /// Returns an error if either read fails; local state is left unchanged then.
    pub async fn refresh(&mut self) -> Result<()> {
        let max_budget = self.store.load_budget().await?;
        let items = self.store.load_items().await?;
        debug!(
            backend = self.store.backend().as_str(),
            items = items.len(),
            max_budget,
            "list loaded"
        );
        self.max_budget = max_budget;
        self.items = items;
        Ok(())
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn max_budget(&self) -> f64 {
        self.max_budget
    }

    #[must_use]
    pub fn policy(&self) -> ListPolicy {
        self.policy
    }

    #[must_use]
    pub fn store(&self) -> &P {
        &self.store
    }

    /// Totals for the current rows and budget.
    #[must_use]
    pub fn totals(&self) -> Totals {
        compute_totals(&self.items, self.max_budget, self.policy.quantity_policy)
    }

    /// Change the budget cap and mirror it to the store.
    pub async fn set_budget(&mut self, max_budget: f64) {
        self.max_budget = max_budget;
        let result = self.store.save_budget(max_budget).await;
        self.settle(WriteOp::SaveBudget, None, result);
    }

    /// Append the open entry row and return its index.
    ///
    /// The row is persisted and, once the store hands back an id, that id is
    /// attached to this row. If creation fails the row stays id-less, so later
    /// edits to it are local only.
    pub async fn insert_blank(&mut self) -> usize {
        let item = LineItem::blank();
        self.items.push(item.clone());
        let index = self.items.len() - 1;

        match self.store.add_item(&item).await {
            Ok(id) => {
                if let Some(row) = self.items.get_mut(index) {
                    row.id = Some(id);
                }
            }
            Err(error) => self.report(WriteOp::AddItem, None, error),
        }

        index
    }

    /// Set one field of the row at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if there is no such row.
    pub async fn update_field(
        &mut self,
        index: usize,
        field: ItemField,
        value: impl Into<String>,
    ) -> Result<()> {
        let len = self.items.len();
        let row = self
            .items
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        row.set(field, value);

        let snapshot = row.clone();
        if let Some(id) = snapshot.id {
            let result = self.store.update_item(id, &snapshot).await;
            self.settle(WriteOp::UpdateItem, Some(id), result);
        }
        Ok(())
    }

    /// Remove the row at `index` and return it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if there is no such row.
    pub async fn delete_at(&mut self, index: usize) -> Result<LineItem> {
        if index >= self.items.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        let removed = self.items.remove(index);

        if let Some(id) = removed.id {
            let result = self.store.delete_item(id).await;
            self.settle(WriteOp::DeleteItem, Some(id), result);
        }
        Ok(removed)
    }

    /// Make sure the list ends with an open entry row.
    ///
    /// Adds one if the list is empty or its last row has both fields filled.
    /// Returns the index of the added row, if any.
    pub async fn ensure_trailing_blank(&mut self) -> Option<usize> {
        let needs_row = self.items.last().is_none_or(LineItem::is_complete);
        if needs_row {
            Some(self.insert_blank().await)
        } else {
            None
        }
    }

    /// Stable-sort rows: unpriced first, then priced rows by descending
    /// quantity and then descending price. An open entry row at the end
    /// stays at the end.
    ///
    /// A changed order is written with a bulk replace, after which the rows
    /// are reloaded so they carry the ids the store assigned. Returns whether
    /// the order changed.
    pub async fn reorder_by_completeness(&mut self) -> bool {
        let mut sorted = self.items.clone();
        let open_row = sorted.last().is_some_and(|row| !row.is_complete());
        let settled = sorted.len() - usize::from(open_row);
        sorted[..settled].sort_by(completeness_order);

        let unchanged = sorted
            .iter()
            .zip(&self.items)
            .all(|(a, b)| a.id == b.id && a.same_values(b));
        if unchanged {
            return false;
        }
        self.items = sorted;

        let result = self.store.bulk_replace_items(&self.items).await;
        let replaced = result.is_ok();
        self.settle(WriteOp::BulkReplace, None, result);

        if replaced {
            self.adopt_store_ids().await;
        }
        true
    }

    /// What happens when an edit is finished (the field loses focus):
    /// optionally reorder, then guarantee the open entry row.
    pub async fn commit_row(&mut self) {
        if self.policy.reorder_on_commit {
            self.reorder_by_completeness().await;
        }
        self.ensure_trailing_blank().await;
    }

    /// Delete every row, then add a fresh open entry row.
    pub async fn clear_all(&mut self) {
        let ids: Vec<ItemId> = self.items.iter().filter_map(|i| i.id).collect();
        self.items.clear();
        info!(deleted = ids.len(), "clearing list");

        for id in ids {
            let result = self.store.delete_item(id).await;
            self.settle(WriteOp::DeleteItem, Some(id), result);
        }

        self.insert_blank().await;
    }

    /// Take ids from the store's copy after a bulk replace, row by row.
    ///
    /// Only applied when the store holds the same rows in the same order;
    /// otherwise the in-memory rows keep no id.
    async fn adopt_store_ids(&mut self) {
        match self.store.load_items().await {
            Ok(stored)
                if stored.len() == self.items.len()
                    && stored.iter().zip(&self.items).all(|(s, m)| s.same_values(m)) =>
            {
                for (mine, theirs) in self.items.iter_mut().zip(stored) {
                    mine.id = theirs.id;
                }
            }
            Ok(_) => {
                debug!("store diverged after bulk replace; dropping stale ids");
                for item in &mut self.items {
                    item.id = None;
                }
            }
            Err(error) => {
                for item in &mut self.items {
                    item.id = None;
                }
                self.report(WriteOp::BulkReplace, None, error);
            }
        }
    }

    fn settle(&self, op: WriteOp, item_id: Option<ItemId>, result: Result<()>) {
        if let Err(error) = result {
            self.report(op, item_id, error);
        }
    }

    fn report(&self, op: WriteOp, item_id: Option<ItemId>, error: Error) {
        self.sink.report(&WriteFailure { op, item_id, error });
    }
}

/// Sort key for [`ShoppingList::reorder_by_completeness`].
fn completeness_order(a: &LineItem, b: &LineItem) -> Ordering {
    match (a.has_positive_price(), b.has_positive_price()) {
        (false, false) => Ordering::Equal,
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => b
            .quantity_value()
            .total_cmp(&a.quantity_value())
            .then_with(|| b.price_value().total_cmp(&a.price_value())),
    }
}
