//! Rate table display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::RateTable;

#[derive(Tabled)]
struct RateRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Currency")]
    label: String,
    #[tabled(rename = "Rate")]
    rate: String,
}

/// Format the rate table, one currency per row
pub fn format_rate_table(rates: &RateTable, home_symbol: &str) -> String {
    let rows: Vec<RateRow> = rates
        .entries()
        .iter()
        .map(|entry| RateRow {
            code: entry.code.clone(),
            label: entry.label.clone(),
            rate: format!("{}{}", home_symbol, entry.rate),
        })
        .collect();

    Table::new(rows).with(Style::sharp()).to_string()
}
