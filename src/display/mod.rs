//! Display formatting for terminal output
//!
//! Provides utilities for formatting the rate table and submission history
//! for terminal display.

pub mod history;
pub mod rates;

pub use history::format_history;
pub use rates::format_rate_table;
