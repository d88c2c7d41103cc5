//! Serve command implementation.

use std::path::PathBuf;

use tokio::net::TcpListener;
use tracing::info;

use super::block_on;
use crate::config::resolve_db_path;
use crate::error::{Error, Result};
use crate::server;
use crate::storage::SqliteStorage;

/// Open the database and run the API server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the address cannot
/// be bound. Both are fatal at startup.
pub fn execute(db_path: Option<&PathBuf>, host: &str, port: u16) -> Result<()> {
    let db_path = resolve_db_path(db_path.map(PathBuf::as_path))
        .ok_or_else(|| Error::Config("cannot determine database path".into()))?;

    let storage = SqliteStorage::open(&db_path)?;
    info!(path = %db_path.display(), "database ready");

    block_on(async {
        let listener = TcpListener::bind((host, port)).await?;
        server::serve(listener, storage).await
    })
}
