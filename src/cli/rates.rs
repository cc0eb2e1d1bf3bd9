//! Rate table CLI command

use crate::display::format_rate_table;
use crate::models::RateTable;

/// Handle `bills rates`
pub fn handle_rates_command(rates: &RateTable, home_symbol: &str) {
    println!("{}", format_rate_table(rates, home_symbol));
}
