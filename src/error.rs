//! Unified error types for the ledger.
//!
//! Errors split into two camps. Persistence problems on the read path
//! (missing or corrupt data file, unreadable settings) are logged and replaced
//! with safe defaults so the user can keep working. Everything else, notably a
//! failed save or a rejected form, is propagated to the caller.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for ledger operations.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// I/O errors from data, settings or config files.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON or TOML parsing/serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// User input rejected by validation. The message is meant for display.
    #[error("{message}")]
    InvalidInput { message: String },

    /// Editor state machine violations (invalid transitions).
    #[error("invalid state: {message}")]
    InvalidState { message: String },

    /// No semester at the given year/position.
    #[error("no semester at position {index} in {year}")]
    SemesterNotFound { year: String, index: usize },

    /// No semester with the given identifier.
    #[error("unknown semester id: {id}")]
    UnknownSemester { id: u64 },
}

/// A specialized Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

impl LedgerError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a user-facing validation error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an invalid state error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create a semester-not-found error for a positional lookup.
    pub fn semester_not_found(year: impl Into<String>, index: usize) -> Self {
        Self::SemesterNotFound {
            year: year.into(),
            index,
        }
    }

    /// Whether the error is a recoverable, user-facing rejection.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}

impl From<io::Error> for LedgerError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Trait for fail-open error handling.
///
/// Used on the read side of persistence: log the error and carry on with a
/// safe default instead of refusing to start.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using default)", context, err);
                T::default()
            }
        }
    }
}

/// Exit codes for the `gpa` CLI.
pub mod exit_codes {
    /// Command completed.
    pub const SUCCESS: i32 = 0;

    /// Command failed (validation, save failure, bad arguments).
    pub const ERROR: i32 = 1;

    /// Process panicked.
    pub const CRASH: i32 = 3;
}
