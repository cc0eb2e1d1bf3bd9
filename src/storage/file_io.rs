//! Workbook I/O with atomic writes
//!
//! Provides safe workbook saves that won't corrupt the ledger on failure.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use umya_spreadsheet::Spreadsheet;

use super::lock::classify_open_error;
use crate::error::{BillError, BillResult};

/// Temp file used while saving a workbook
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Read an xlsx workbook
pub fn read_workbook(path: &Path) -> BillResult<Spreadsheet> {
    umya_spreadsheet::reader::xlsx::read(path).map_err(|e| {
        BillError::Spreadsheet(format!("Failed to read {}: {}", path.display(), e))
    })
}

/// Write a workbook atomically (write to temp, then rename)
///
/// The ledger is either completely replaced or not modified at all.
pub fn write_workbook_atomic(path: &Path, book: &Spreadsheet) -> BillResult<()> {
    let temp_path = temp_path_for(path);

    umya_spreadsheet::writer::xlsx::write(book, &temp_path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        BillError::Spreadsheet(format!("Failed to write {}: {}", temp_path.display(), e))
    })?;

    // Sync to disk before rename
    File::open(&temp_path)
        .and_then(|file| file.sync_all())
        .map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            BillError::Io(format!("Failed to sync workbook: {}", e))
        })?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        classify_open_error(path, e)
    })?;

    Ok(())
}
