//! Persistence adapters.
//!
//! [`Persistence`] is the one contract the list state manager talks to. Two
//! implementations sit behind it and are picked when the app is composed:
//!
//! - [`LocalPersistence`] - one JSON snapshot in a [`KeyValueStore`]
//! - [`RemotePersistence`] - the REST API over HTTP
//!
//! Callers that treat writes as best-effort report failures to a
//! [`FailureSink`] instead of propagating them.

pub mod kv;
pub mod local;
pub mod remote;
pub mod store;

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::{Error, Result};
use crate::model::{ItemId, LineItem};

pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use local::LocalPersistence;
pub use remote::RemotePersistence;
pub use store::Store;

/// Which adapter backs the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Snapshot in local key/value storage
    Local,
    /// Server + SQLite over HTTP
    #[default]
    Remote,
}

impl Backend {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

/// Durable home for the budget and the ordered item list.
///
/// Methods are async so HTTP-backed stores fit; synchronous stores simply
/// complete immediately.
pub trait Persistence: Send + Sync {
    fn backend(&self) -> Backend;

    fn load_budget(&self) -> impl Future<Output = Result<f64>> + Send;

    fn save_budget(&self, max_budget: f64) -> impl Future<Output = Result<()>> + Send;

    /// Items in display order, each carrying its id.
    fn load_items(&self) -> impl Future<Output = Result<Vec<LineItem>>> + Send;

    /// Persist a new item at the end of the list and return its id.
    fn add_item(&self, item: &LineItem) -> impl Future<Output = Result<ItemId>> + Send;

    /// Overwrite quantity and price of `id`. Unknown ids are not an error.
    fn update_item(&self, id: ItemId, item: &LineItem) -> impl Future<Output = Result<()>> + Send;

    /// Delete `id`. Unknown ids are not an error.
    fn delete_item(&self, id: ItemId) -> impl Future<Output = Result<()>> + Send;

    /// Replace the whole list, in order. Incoming ids are ignored.
    fn bulk_replace_items(&self, items: &[LineItem]) -> impl Future<Output = Result<()>> + Send;
}

/// The write that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    SaveBudget,
    AddItem,
    UpdateItem,
    DeleteItem,
    BulkReplace,
}

impl WriteOp {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SaveBudget => "save_budget",
            Self::AddItem => "add_item",
            Self::UpdateItem => "update_item",
            Self::DeleteItem => "delete_item",
            Self::BulkReplace => "bulk_replace_items",
        }
    }
}

impl fmt::Display for WriteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A best-effort write that did not reach the store.
#[derive(Debug)]
pub struct WriteFailure {
    pub op: WriteOp,
    pub item_id: Option<ItemId>,
    pub error: Error,
}

/// Receives best-effort write failures.
pub trait FailureSink: Send + Sync {
    fn report(&self, failure: &WriteFailure);
}

impl<F> FailureSink for F
where
    F: Fn(&WriteFailure) + Send + Sync,
{
    fn report(&self, failure: &WriteFailure) {
        self(failure);
    }
}

/// Default sink: an error event and nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl FailureSink for LogSink {
    fn report(&self, failure: &WriteFailure) {
        error!(
            op = %failure.op,
            item_id = ?failure.item_id,
            error = %failure.error,
            "write did not reach the store; in-memory list kept"
        );
    }
}
