//! History CLI command

use crate::display::format_history;
use crate::error::BillResult;
use crate::storage::HistoryLog;

/// Handle `bills history`
pub fn handle_history_command(log: &HistoryLog, limit: usize) -> BillResult<()> {
    let entries = log.read_recent(limit)?;
    print!("{}", format_history(&entries));
    Ok(())
}
