//! Bill CLI commands
//!
//! Implements `bills add`, the non-interactive form.

use chrono::Local;
use clap::Args;

use crate::error::BillResult;
use crate::models::{parse_amount, parse_date, BillCategory, BillInput};
use crate::services::{BillService, SubmissionReceipt};

/// Arguments for adding a bill
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Amount in the foreign currency
    pub amount: String,

    /// Currency label or code (e.g. "USD")
    #[arg(short = 'C', long)]
    pub currency: String,

    /// Bill category
    #[arg(short, long, default_value_t = BillCategory::default())]
    pub category: BillCategory,

    /// Where the bill was paid
    #[arg(short, long, default_value = "")]
    pub place: String,

    /// Link to the bill
    #[arg(short, long, default_value = "")]
    pub link: String,

    /// Bill date (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    pub date: Option<String>,
}

impl AddArgs {
    /// Build a submission, resolving the currency against the service's rates
    pub fn to_input(&self, service: &BillService<'_>) -> BillResult<BillInput> {
        let date = match &self.date {
            Some(date) => parse_date(date)?,
            None => Local::now().date_naive(),
        };
        let entry = service.rates().resolve(&self.currency)?;

        Ok(BillInput {
            date,
            category: self.category,
            place: self.place.trim().to_string(),
            currency_label: entry.label.clone(),
            amount_foreign: parse_amount(&self.amount)?,
            link: self.link.trim().to_string(),
        })
    }
}

/// Handle `bills add`
pub fn handle_add_command(service: &BillService<'_>, args: AddArgs) -> BillResult<SubmissionReceipt> {
    let input = args.to_input(service)?;
    let receipt = service.submit(&input)?;

    println!("{}", receipt.message());
    println!("  Row:    {}", receipt.row);
    println!("  Ledger: {}", service.ledger_path().display());

    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RateTable;
    use crate::storage::LedgerLayout;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn args(currency: &str) -> AddArgs {
        AddArgs {
            amount: "100.00".into(),
            currency: currency.into(),
            category: BillCategory::Hotel,
            place: " Paris".into(),
            link: "http://x".into(),
            date: Some("2024-01-15".into()),
        }
    }

    #[test]
    fn test_to_input_accepts_code_or_label() {
        let rates = RateTable::default();
        let service = BillService::new(&rates, "unused.xlsx", LedgerLayout::default());

        let by_code = args("usd").to_input(&service).unwrap();
        let by_label = args("USD (United States)").to_input(&service).unwrap();
        assert_eq!(by_code, by_label);
        assert_eq!(by_code.currency_label, "USD (United States)");
        assert_eq!(by_code.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(by_code.place, "Paris");
        assert_eq!(by_code.amount_foreign, dec!(100.00));
    }

    #[test]
    fn test_to_input_rejects_bad_values() {
        let rates = RateTable::default();
        let service = BillService::new(&rates, "unused.xlsx", LedgerLayout::default());

        assert!(args("CHF").to_input(&service).is_err());

        let mut bad_date = args("USD");
        bad_date.date = Some("15/01/2024".into());
        assert!(bad_date.to_input(&service).unwrap_err().is_validation());

        let mut negative = args("USD");
        negative.amount = "-1".into();
        assert!(negative.to_input(&service).unwrap_err().is_validation());
    }
}
