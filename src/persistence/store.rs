//! The backend picked at startup.

use super::kv::FileStore;
use super::local::LocalPersistence;
use super::remote::RemotePersistence;
use super::{Backend, Persistence};
use crate::error::Result;
use crate::model::{ItemId, LineItem};

/// Either adapter, chosen once when the app is composed.
#[derive(Debug)]
pub enum Store {
    Local(LocalPersistence<FileStore>),
    Remote(RemotePersistence),
}

impl Persistence for Store {
    fn backend(&self) -> Backend {
        match self {
            Self::Local(_) => Backend::Local,
            Self::Remote(_) => Backend::Remote,
        }
    }

    async fn load_budget(&self) -> Result<f64> {
        match self {
            Self::Local(s) => s.load_budget().await,
            Self::Remote(s) => s.load_budget().await,
        }
    }

    async fn save_budget(&self, max_budget: f64) -> Result<()> {
        match self {
            Self::Local(s) => s.save_budget(max_budget).await,
            Self::Remote(s) => s.save_budget(max_budget).await,
        }
    }

    async fn load_items(&self) -> Result<Vec<LineItem>> {
        match self {
            Self::Local(s) => s.load_items().await,
            Self::Remote(s) => s.load_items().await,
        }
    }

    async fn add_item(&self, item: &LineItem) -> Result<ItemId> {
        match self {
            Self::Local(s) => s.add_item(item).await,
            Self::Remote(s) => s.add_item(item).await,
        }
    }

    async fn update_item(&self, id: ItemId, item: &LineItem) -> Result<()> {
        match self {
            Self::Local(s) => s.update_item(id, item).await,
            Self::Remote(s) => s.update_item(id, item).await,
        }
    }

    async fn delete_item(&self, id: ItemId) -> Result<()> {
        match self {
            Self::Local(s) => s.delete_item(id).await,
            Self::Remote(s) => s.delete_item(id).await,
        }
    }

    async fn bulk_replace_items(&self, items: &[LineItem]) -> Result<()> {
        match self {
            Self::Local(s) => s.bulk_replace_items(items).await,
            Self::Remote(s) => s.bulk_replace_items(items).await,
        }
    }
}
