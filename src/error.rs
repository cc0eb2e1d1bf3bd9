//! Custom error types for bill-ledger
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// The main error type for bill-ledger operations
#[derive(Error, Debug)]
pub enum BillError {
    /// The ledger file does not exist at the configured path
    #[error("Ledger file '{}' not found.", path.display())]
    LedgerNotFound { path: PathBuf },

    /// Another process holds the ledger file open
    #[error(
        "The ledger file '{}' is open in another program. Please close it and try again.",
        path.display()
    )]
    LedgerLocked { path: PathBuf },

    /// The ledger has no data row to copy formatting from
    #[error(
        "Ledger '{}' has no template row to copy formatting from. Add one formatted row below the header first.",
        path.display()
    )]
    NoTemplateRow { path: PathBuf },

    /// Currency label is not in the rate table
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Currency label has no code/country separator
    #[error("Malformed currency label '{0}': expected '<CODE> (<Country>)'")]
    MalformedLabel(String),

    /// Validation errors for form input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Errors reading or writing the xlsx workbook
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),
}

impl BillError {
    /// Create a "ledger not found" error
    pub fn ledger_not_found(path: impl AsRef<Path>) -> Self {
        Self::LedgerNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a "ledger locked" error
    pub fn ledger_locked(path: impl AsRef<Path>) -> Self {
        Self::LedgerLocked {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::LedgerNotFound { .. })
    }

    /// Check if the user can fix this and submit again unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LedgerLocked { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for BillError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BillError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for bill-ledger operations
pub type BillResult<T> = Result<T, BillError>;
