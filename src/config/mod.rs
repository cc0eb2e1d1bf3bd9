//! Configuration module for bill-ledger
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - Ledger location, layout and currency overrides

pub mod paths;
pub mod settings;

pub use paths::BillPaths;
pub use settings::{CurrencySetting, Settings};
