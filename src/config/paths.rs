//! Path management for bill-ledger
//!
//! Provides XDG-compliant path resolution for configuration, history and the
//! default ledger location.
//!
//! ## Path Resolution Order
//!
//! 1. `BILL_LEDGER_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/bill-ledger` or `~/.config/bill-ledger`
//! 3. Windows: `%APPDATA%\bill-ledger`

use std::path::PathBuf;

use crate::error::BillError;

/// File name of the ledger when none is configured
pub const DEFAULT_LEDGER_FILE: &str = "my_bills.xlsx";

/// Manages all paths used by bill-ledger
#[derive(Debug, Clone)]
pub struct BillPaths {
    /// Base directory for all bill-ledger data
    base_dir: PathBuf,
}

impl BillPaths {
    /// Create a new BillPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, BillError> {
        let base_dir = if let Ok(custom) = std::env::var("BILL_LEDGER_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create BillPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/bill-ledger/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the submission history log
    pub fn history_log(&self) -> PathBuf {
        self.base_dir.join("history.log")
    }

    /// Ledger location used when the settings don't name one
    pub fn default_ledger_file(&self) -> PathBuf {
        self.base_dir.join(DEFAULT_LEDGER_FILE)
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), BillError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BillError::Io(format!("Failed to create base directory: {}", e)))
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, BillError> {
    // Unix (Linux/macOS): Use XDG_CONFIG_HOME if set, otherwise ~/.config
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME").map_err(|_| {
                BillError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("bill-ledger"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, BillError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| BillError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("bill-ledger"))
}
