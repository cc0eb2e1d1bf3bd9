//! Business logic layer
//!
//! Services sit between the form surfaces (CLI, TUI) and the storage layer.

pub mod bill;

pub use bill::{BillService, SubmissionReceipt};
