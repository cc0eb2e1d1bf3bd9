//! Submission history
//!
//! Every bill appended to the ledger is also recorded as one JSON line in
//! `history.log`. The log is append-only and independent of the ledger, so
//! it survives edits the user makes to the spreadsheet by hand.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ledger::RowIndex;
use crate::error::{BillError, BillResult};
use crate::models::BillRecord;

/// One successful submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// When the bill was appended (UTC)
    pub timestamp: DateTime<Utc>,

    /// Submission identifier
    pub id: Uuid,

    /// Ledger the bill went to
    pub ledger: PathBuf,

    /// Row the bill occupies
    pub row: RowIndex,

    /// The bill as written
    pub record: BillRecord,
}

impl HistoryEntry {
    /// Create an entry stamped now
    pub fn new(ledger: impl AsRef<Path>, row: RowIndex, record: BillRecord) -> Self {
        Self {
            timestamp: Utc::now(),
            id: Uuid::new_v4(),
            ledger: ledger.as_ref().to_path_buf(),
            row,
            record,
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let record = &self.record;
        let mut output = format!(
            "[{}] row {} {} {} {:.2} {} = {:.2}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.row,
            record.date.format("%Y-%m-%d"),
            record.category,
            record.amount_foreign,
            record.currency_code,
            record.amount_home,
        );

        if !record.place.is_empty() {
            output.push_str(&format!(" ({})", record.place));
        }

        output
    }
}

/// Handles writing history entries to the history log file
///
/// The log file uses a line-delimited JSON format (JSONL).
pub struct HistoryLog {
    log_path: PathBuf,
}

impl HistoryLog {
    /// Create a HistoryLog that writes to the specified path
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Append an entry and flush it
    pub fn log(&self, entry: &HistoryEntry) -> BillResult<()> {
        if let Some(parent) = self.log_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| BillError::Io(format!("Failed to create history directory: {}", e)))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| BillError::Io(format!("Failed to open history log: {}", e)))?;

        let json = serde_json::to_string(entry)
            .map_err(|e| BillError::Json(format!("Failed to serialize history entry: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| BillError::Io(format!("Failed to write history entry: {}", e)))?;

        file.flush()
            .map_err(|e| BillError::Io(format!("Failed to flush history log: {}", e)))?;

        Ok(())
    }

    /// Read all entries, oldest first
    pub fn read_all(&self) -> BillResult<Vec<HistoryEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| BillError::Io(format!("Failed to open history log: {}", e)))?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                BillError::Io(format!("Failed to read history line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: HistoryEntry = serde_json::from_str(&line).map_err(|e| {
                BillError::Json(format!(
                    "Failed to parse history entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            entries.push(entry);
        }

        Ok(entries)
    }

    /// Read the most recent N entries, oldest first
    pub fn read_recent(&self, count: usize) -> BillResult<Vec<HistoryEntry>> {
        let all_entries = self.read_all()?;
        let skip = all_entries.len().saturating_sub(count);
        Ok(all_entries.into_iter().skip(skip).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BillCategory;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn record(place: &str) -> BillRecord {
        BillRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            category: BillCategory::Food,
            place: place.into(),
            currency_code: "EUR".into(),
            amount_foreign: dec!(12.00),
            amount_home: dec!(1110.00),
            link: String::new(),
        }
    }

    #[test]
    fn test_log_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("logs").join("history.log");
        let log = HistoryLog::new(log_path.clone());
        assert_eq!(log.path(), log_path.as_path());

        let entry = HistoryEntry::new("my_bills.xlsx", 7, record("Lisbon"));
        log.log(&entry).unwrap();

        assert!(log_path.exists());
        let entries = log.read_all().unwrap();
        assert_eq!(entries, vec![entry]);
    }

    #[test]
    fn test_read_missing_log_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let log = HistoryLog::new(temp_dir.path().join("history.log"));
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_read_recent() {
        let temp_dir = TempDir::new().unwrap();
        let log = HistoryLog::new(temp_dir.path().join("history.log"));

        for row in 2..7 {
            log.log(&HistoryEntry::new("my_bills.xlsx", row, record("Oslo")))
                .unwrap();
        }

        let recent = log.read_recent(2).unwrap();
        let rows: Vec<RowIndex> = recent.iter().map(|e| e.row).collect();
        assert_eq!(rows, vec![5, 6]);
        assert_eq!(log.read_recent(50).unwrap().len(), 5);
    }

    #[test]
    fn test_format_human_readable() {
        let entry = HistoryEntry::new("my_bills.xlsx", 3, record("Lisbon"));
        let text = entry.format_human_readable();
        assert!(text.contains("row 3 2024-01-15 Food 12.00 EUR = 1110.00"));
        assert!(text.ends_with("(Lisbon)"));
    }
}
