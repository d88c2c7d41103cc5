//! Command implementations.
//!
//! List commands share [`App`], which resolves the backend from flags and the
//! settings file and loads a [`ShoppingList`] over it.

pub mod budget;
pub mod completions;
pub mod item;
pub mod migrate;
pub mod serve;
pub mod totals;
pub mod version;

mod output;

use std::future::Future;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::cli::Cli;
use crate::config::{load_settings, resolve_local_dir};
use crate::error::{Error, Result};
use crate::list::{ListPolicy, ShoppingList};
use crate::migrate::migrate_legacy;
use crate::persistence::{Backend, FileStore, LocalPersistence, RemotePersistence, Store};

/// Resolved settings for commands that work on the list.
#[derive(Debug, Clone)]
pub struct App {
    pub backend: Backend,
    pub api_url: String,
    pub local_dir: PathBuf,
    pub policy: ListPolicy,
}

impl App {
    /// Merge CLI flags over the settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file is invalid or no home directory exists.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let settings = load_settings()?;
        let local_dir = resolve_local_dir(cli.local_dir.as_deref())
            .ok_or_else(|| Error::Config("cannot determine home directory".into()))?;

        let app = Self {
            backend: cli.backend.unwrap_or(settings.backend),
            api_url: cli.api_url.clone().unwrap_or_else(|| settings.api_url.clone()),
            local_dir,
            policy: settings.list_policy(),
        };
        debug!(backend = app.backend.as_str(), api_url = %app.api_url, "app resolved");
        Ok(app)
    }

    /// Key/value files for the local backend and legacy data.
    #[must_use]
    pub fn local_files(&self) -> FileStore {
        FileStore::new(&self.local_dir)
    }

    #[must_use]
    pub fn remote(&self) -> RemotePersistence {
        RemotePersistence::new(&self.api_url)
    }

    /// Compose the configured backend and load the list from it.
    ///
    /// The remote backend first gets any legacy local data. A failed
    /// migration is logged and retried on the next start.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial load fails.
    pub async fn open_list(&self) -> Result<ShoppingList<Store>> {
        let store = match self.backend {
            Backend::Local => Store::Local(LocalPersistence::new(self.local_files())),
            Backend::Remote => {
                let remote = self.remote();
                if let Err(e) = migrate_legacy(&self.local_files(), &remote).await {
                    warn!(error = %e, "legacy migration failed; keeping local copy");
                }
                Store::Remote(remote)
            }
        };
        ShoppingList::load(store, self.policy).await
    }
}

/// Run an async command body on a fresh runtime.
///
/// # Errors
///
/// Returns an error if the runtime cannot start, or whatever `fut` returns.
pub fn block_on<F: Future<Output = Result<()>>>(fut: F) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))?;
    rt.block_on(fut)
}

/// Restate a list index error in 1-based row numbers.
fn row_error(error: Error) -> Error {
    match error {
        Error::IndexOutOfRange { index, len } => Error::NoSuchRow {
            row: index + 1,
            rows: len,
        },
        other => other,
    }
}

/// Convert a 1-based row number from the command line.
fn row_index(number: usize) -> Result<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| Error::InvalidArgument("row numbers start at 1".into()))
}
