//! User settings file.
//!
//! Optional JSON at `~/.kishop/config.json` (or `KISHOP_CONFIG`). A missing
//! file means defaults; unknown keys are ignored.
//!
//! ```json
//! {
//!   "quantityPolicy": "all-rows",
//!   "reorderOnCommit": true,
//!   "apiUrl": "http://localhost:3001",
//!   "backend": "remote"
//! }
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::list::ListPolicy;
use crate::persistence::remote::DEFAULT_API_URL;
use crate::persistence::Backend;
use crate::totals::QuantityPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub quantity_policy: QuantityPolicy,
    pub reorder_on_commit: bool,
    pub api_url: String,
    pub backend: Backend,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quantity_policy: QuantityPolicy::default(),
            reorder_on_commit: false,
            api_url: DEFAULT_API_URL.to_string(),
            backend: Backend::default(),
        }
    }
}

impl Settings {
    #[must_use]
    pub fn list_policy(&self) -> ListPolicy {
        ListPolicy {
            quantity_policy: self.quantity_policy,
            reorder_on_commit: self.reorder_on_commit,
        }
    }

    /// Parse settings from a file; a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file is unreadable or not valid JSON.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file; using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(Error::Config(format!(
                    "cannot read {}: {e}",
                    path.display()
                )));
            }
        };

        serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("invalid settings in {}: {e}", path.display())))
    }
}

/// Location of the settings file: `KISHOP_CONFIG`, else `~/.kishop/config.json`.
#[must_use]
pub fn settings_path() -> Option<PathBuf> {
    std::env::var("KISHOP_CONFIG")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| super::kishop_dir().map(|dir| dir.join("config.json")))
}

/// Load settings from [`settings_path`].
///
/// # Errors
///
/// See [`Settings::from_file`].
pub fn load_settings() -> Result<Settings> {
    match settings_path() {
        Some(path) => Settings::from_file(&path),
        None => Ok(Settings::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::from_file(&dir.path().join("config.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.api_url, "http://localhost:3001");
        assert_eq!(settings.backend, Backend::Remote);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"quantityPolicy":"all-rows","reorderOnCommit":true}"#).unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.quantity_policy, QuantityPolicy::AllRows);
        assert!(settings.reorder_on_commit);
        assert_eq!(settings.backend, Backend::Remote);

        let policy = settings.list_policy();
        assert!(policy.reorder_on_commit);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"backend":"carrier-pigeon"}"#).unwrap();

        let err = Settings::from_file(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
