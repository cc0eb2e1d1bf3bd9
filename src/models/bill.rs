//! Bill model
//!
//! A `BillInput` is what the user typed into the form. Resolving it against
//! the rate table yields a `BillRecord`, the fully converted row that gets
//! written to the ledger.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::BillCategory;
use super::currency::{convert, RateTable};
use crate::error::{BillError, BillResult};

/// Date format accepted by the form surfaces
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a form date (YYYY-MM-DD)
pub fn parse_date(s: &str) -> BillResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| {
        BillError::Validation(format!("Invalid date format: '{}'. Use YYYY-MM-DD", s))
    })
}

/// Parse a form amount, rejecting negatives
pub fn parse_amount(s: &str) -> BillResult<Decimal> {
    let amount = Decimal::from_str(s.trim()).map_err(|_| {
        BillError::Validation(format!(
            "Invalid amount format: '{}'. Use a number like '100' or '12.50'",
            s
        ))
    })?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(BillError::Validation(format!(
            "Amount must not be negative: {}",
            s
        )));
    }

    Ok(amount)
}

/// A form submission before currency conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillInput {
    pub date: NaiveDate,
    pub category: BillCategory,
    #[serde(default)]
    pub place: String,
    /// Currency label as listed in the rate table
    pub currency_label: String,
    pub amount_foreign: Decimal,
    #[serde(default)]
    pub link: String,
}

/// A resolved bill, ready to be appended to the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillRecord {
    pub date: NaiveDate,
    pub category: BillCategory,
    pub place: String,
    pub currency_code: String,
    pub amount_foreign: Decimal,
    /// `amount_foreign * rate`, rounded to 2 decimal places
    pub amount_home: Decimal,
    pub link: String,
}

impl BillRecord {
    /// Resolve a form submission against the rate table
    pub fn resolve(input: &BillInput, rates: &RateTable) -> BillResult<Self> {
        if input.amount_foreign.is_sign_negative() && !input.amount_foreign.is_zero() {
            return Err(BillError::Validation(format!(
                "Amount must not be negative: {}",
                input.amount_foreign
            )));
        }

        let rate = rates.rate_of(&input.currency_label)?;
        let currency_code = rates.code_of(&input.currency_label)?.to_string();
        let amount_home = convert(input.amount_foreign, rate)?;

        Ok(Self {
            date: input.date,
            category: input.category,
            place: input.place.clone(),
            currency_code,
            amount_foreign: input.amount_foreign,
            amount_home,
            link: input.link.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(label: &str, amount: Decimal) -> BillInput {
        BillInput {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            category: BillCategory::Hotel,
            place: "Paris".into(),
            currency_label: label.into(),
            amount_foreign: amount,
            link: "http://x".into(),
        }
    }

    #[test]
    fn test_resolve_usd_hotel() {
        let rates = RateTable::default();
        let record = BillRecord::resolve(&input("USD (United States)", dec!(100.00)), &rates)
            .unwrap();

        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(record.category, BillCategory::Hotel);
        assert_eq!(record.place, "Paris");
        assert_eq!(record.currency_code, "USD");
        assert_eq!(record.amount_foreign, dec!(100.00));
        assert_eq!(record.amount_home, dec!(8320.00));
        assert_eq!(record.link, "http://x");
    }

    #[test]
    fn test_resolve_zero_amount() {
        let rates = RateTable::default();
        let record = BillRecord::resolve(&input("GBP (United Kingdom)", dec!(0)), &rates).unwrap();
        assert!(record.amount_home.is_zero());
    }

    #[test]
    fn test_resolve_rejects_negative() {
        let rates = RateTable::default();
        let err = BillRecord::resolve(&input("INR (India)", dec!(-5)), &rates).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_resolve_unknown_currency() {
        let rates = RateTable::default();
        let err = BillRecord::resolve(&input("CHF (Switzerland)", dec!(5)), &rates).unwrap_err();
        assert!(matches!(err, BillError::UnknownCurrency(_)));
    }

    #[test]
    fn test_resolve_huge_amount_is_rejected() {
        let rates = RateTable::default();
        let amount = parse_amount("79228162514264337593543950335").unwrap();
        let err = BillRecord::resolve(&input("GBP (United Kingdom)", amount), &rates).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12.50").unwrap(), dec!(12.50));
        assert_eq!(parse_amount(" 0 ").unwrap(), Decimal::ZERO);
        assert!(parse_amount("-1").unwrap_err().is_validation());
        assert!(parse_amount("abc").unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert!(parse_date("15/01/2024").is_err());
    }
}
