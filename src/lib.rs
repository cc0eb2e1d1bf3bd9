//! bill-ledger - Terminal expense entry for a spreadsheet ledger
//!
//! Bills paid abroad are entered through a small form (CLI or TUI), converted
//! to the home currency with a fixed rate table, and appended as a new row to
//! an existing xlsx ledger. The new row copies the formatting of the row above
//! it so the ledger keeps its look.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Currencies, rate table, categories and bill records
//! - `storage`: xlsx ledger writer, lock detection and submission history
//! - `services`: Bill submission
//! - `cli`, `display`, `tui`: Form surfaces
//!
//! # Example
//!
//! ```rust,ignore
//! use bill_ledger::config::{BillPaths, Settings};
//! use bill_ledger::services::BillService;
//!
//! let paths = BillPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let rates = settings.rate_table()?;
//! let service = BillService::new(&rates, settings.ledger_path(&paths), settings.ledger_layout());
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod tui;

pub use error::{BillError, BillResult};
