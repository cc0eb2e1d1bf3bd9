//! Bill submission service
//!
//! Turns a form submission into a ledger row: resolves the currency against
//! the rate table, converts the amount, appends the row and records the
//! submission in the history log.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::BillResult;
use crate::models::{BillInput, BillRecord, RateTable};
use crate::storage::{HistoryEntry, HistoryLog, Ledger, LedgerLayout, RowIndex};

/// Result of a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Row the bill was written to
    pub row: RowIndex,
    /// The bill as written
    pub record: BillRecord,
    /// Symbol of the home currency, for messages
    pub home_symbol: String,
}

impl SubmissionReceipt {
    /// User-facing success message
    pub fn message(&self) -> String {
        format!(
            "Bill added! {:.2} {} = {}{:.2}",
            self.record.amount_foreign,
            self.record.currency_code,
            self.home_symbol,
            self.record.amount_home
        )
    }
}

impl fmt::Display for SubmissionReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Service for submitting bills to the ledger
pub struct BillService<'a> {
    rates: &'a RateTable,
    ledger_path: PathBuf,
    layout: LedgerLayout,
    history: Option<HistoryLog>,
    home_symbol: String,
}

impl<'a> BillService<'a> {
    /// Create a new bill service
    pub fn new(rates: &'a RateTable, ledger_path: impl Into<PathBuf>, layout: LedgerLayout) -> Self {
        Self {
            rates,
            ledger_path: ledger_path.into(),
            layout,
            history: None,
            home_symbol: "₹".to_string(),
        }
    }

    /// Record successful submissions in this history log
    pub fn with_history(mut self, history: HistoryLog) -> Self {
        self.history = Some(history);
        self
    }

    /// Use this symbol for the home currency in messages
    pub fn with_home_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.home_symbol = symbol.into();
        self
    }

    /// The rate table submissions are resolved against
    pub fn rates(&self) -> &RateTable {
        self.rates
    }

    /// Path of the ledger file
    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }

    /// Resolve a submission without touching the ledger
    pub fn preview(&self, input: &BillInput) -> BillResult<BillRecord> {
        BillRecord::resolve(input, self.rates)
    }

    /// Submit a bill: convert it, append it to the ledger and record it
    ///
    /// Any failure aborts this submission only; nothing is retried.
    pub fn submit(&self, input: &BillInput) -> BillResult<SubmissionReceipt> {
        let record = self.preview(input)?;
        debug!(
            currency = %record.currency_code,
            amount_foreign = %record.amount_foreign,
            amount_home = %record.amount_home,
            "resolved bill"
        );

        let mut ledger = Ledger::open(&self.ledger_path, self.layout.clone())?;
        let row = ledger.append_bill(&record)?;

        if let Some(history) = &self.history {
            let entry = HistoryEntry::new(&self.ledger_path, row, record.clone());
            if let Err(e) = history.log(&entry) {
                warn!(error = %e, "failed to record bill in history");
            }
        }

        Ok(SubmissionReceipt {
            row,
            record,
            home_symbol: self.home_symbol.clone(),
        })
    }
}
