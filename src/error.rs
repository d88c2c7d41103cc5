//! Error types for kishop.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=db, 3=not_found, 4=validation, etc.)
//! - Retryability flags
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use thiserror::Error;

/// Result type alias for kishop operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Database (exit 2)
    DatabaseError,

    // Not Found (exit 3)
    IndexOutOfRange,

    // Validation (exit 4)
    InvalidArgument,

    // Remote (exit 6)
    HttpError,
    RemoteError,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::DatabaseError => "DATABASE_ERROR",
            Self::IndexOutOfRange => "INDEX_OUT_OF_RANGE",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::HttpError => "HTTP_ERROR",
            Self::RemoteError => "REMOTE_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::DatabaseError => 2,
            Self::IndexOutOfRange => 3,
            Self::InvalidArgument => 4,
            Self::HttpError | Self::RemoteError => 6,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether a caller may retry the same operation.
    ///
    /// Network failures and busy databases are transient; bad input is not.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::HttpError | Self::RemoteError | Self::DatabaseError)
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in kishop operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server responded {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("No item at index {index} (list has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    /// [`Error::IndexOutOfRange`] in the 1-based row numbers the CLI shows.
    #[error("No row {row} (list has {rows} rows)")]
    NoSuchRow { row: usize, rows: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Http(_) => ErrorCode::HttpError,
            Self::Remote { .. } => ErrorCode::RemoteError,
            Self::IndexOutOfRange { .. } | Self::NoSuchRow { .. } => ErrorCode::IndexOutOfRange,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::IndexOutOfRange { len, .. } => Some(if *len == 0 {
                "The list is empty. Add a row with `kishop item add`.".to_string()
            } else {
                format!("Valid indexes are 0..={}.", len - 1)
            }),

            Self::NoSuchRow { rows, .. } => Some(if *rows == 0 {
                "The list is empty. Add a row with `kishop item add`.".to_string()
            } else {
                format!("Row numbers run 1..={rows}. Use `kishop item list` to see them.")
            }),

            Self::Http(_) => Some(
                "Is the server running? Start it with `kishop serve` \
                 or switch to `--backend local`."
                    .to_string(),
            ),

            Self::Config(_) => Some(
                "Check ~/.kishop/config.json (or the file named by KISHOP_CONFIG).".to_string(),
            ),

            Self::Database(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Remote { .. }
            | Self::InvalidArgument(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
