//! Configuration management.
//!
//! Everything lives under `~/.kishop/`:
//! - **Database**: `~/.kishop/data/shopping.db` (server backend)
//! - **Local snapshot**: `~/.kishop/local/` (local backend and legacy data)
//! - **Settings**: `~/.kishop/config.json`
//!
//! Flags win over environment variables, which win over the settings file.

mod settings;

pub use settings::{load_settings, settings_path, Settings};

use std::path::{Path, PathBuf};

/// Get the kishop home directory (`~/.kishop/`).
#[must_use]
pub fn kishop_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".kishop"))
}

/// Read a non-blank environment variable.
fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

/// Resolve the SQLite database path.
///
/// Priority:
/// 1. `explicit_path` (`--db` or `KISHOP_DB`, handled by clap)
/// 2. `DB_PATH` environment variable
/// 3. `~/.kishop/data/shopping.db`
#[must_use]
pub fn resolve_db_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Some(path) = env_path("DB_PATH") {
        return Some(path);
    }

    kishop_dir().map(|dir| dir.join("data").join("shopping.db"))
}

/// Resolve the directory holding local key/value files.
///
/// `explicit_dir` comes from `--local-dir` or `KISHOP_LOCAL_DIR`.
#[must_use]
pub fn resolve_local_dir(explicit_dir: Option<&Path>) -> Option<PathBuf> {
    explicit_dir
        .map(Path::to_path_buf)
        .or_else(|| kishop_dir().map(|dir| dir.join("local")))
}
