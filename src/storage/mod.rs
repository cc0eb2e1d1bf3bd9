//! Storage layer for bill-ledger
//!
//! Provides the xlsx ledger with atomic saves, detection of ledgers held
//! open by other programs, and the append-only submission history.

pub mod file_io;
pub mod history;
pub mod ledger;
pub mod lock;

pub use file_io::{read_workbook, write_workbook_atomic};
pub use history::{HistoryEntry, HistoryLog};
pub use ledger::{append_bill, Ledger, LedgerColumn, LedgerLayout, LedgerRow, RowIndex, RowStyle};
pub use lock::ensure_available;
