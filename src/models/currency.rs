//! Currency rate table
//!
//! A fixed mapping from a human-readable currency label such as
//! `"USD (United States)"` to the number of home-currency units one unit of
//! that currency is worth. The table is built once at startup and never
//! mutated; callers receive it by reference.

use std::collections::HashSet;
use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{BillError, BillResult};

/// Decimal places kept for converted home-currency amounts
pub const HOME_AMOUNT_DP: u32 = 2;

/// Extract the currency code from a label: everything before the first space
///
/// `"USD (United States)"` yields `"USD"`. A label without a space, or one
/// starting with a space, has no code and is rejected.
pub fn currency_code(label: &str) -> BillResult<&str> {
    match label.split_once(' ') {
        Some((code, _)) if !code.is_empty() => Ok(code),
        _ => Err(BillError::MalformedLabel(label.to_string())),
    }
}

/// Convert a foreign amount to the home currency
///
/// Rounds to two decimal places using round-half-to-even, so `0.125` becomes
/// `0.12` and `0.135` becomes `0.14`. Fails with a validation error when the
/// product does not fit in a `Decimal`.
pub fn convert(amount_foreign: Decimal, rate: Decimal) -> BillResult<Decimal> {
    amount_foreign
        .checked_mul(rate)
        .map(|home| {
            home.round_dp_with_strategy(HOME_AMOUNT_DP, RoundingStrategy::MidpointNearestEven)
        })
        .ok_or_else(|| {
            BillError::Validation(format!(
                "Amount too large to convert: {} at rate {}",
                amount_foreign, rate
            ))
        })
}

/// One supported currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyEntry {
    /// Display name, e.g. "USD (United States)"
    pub label: String,

    /// Leading token of the label, e.g. "USD"
    pub code: String,

    /// Home-currency units per one unit of this currency
    pub rate: Decimal,
}

impl CurrencyEntry {
    /// Create an entry, deriving the code from the label
    pub fn new(label: impl Into<String>, rate: Decimal) -> BillResult<Self> {
        let label = label.into();
        if rate.is_sign_negative() {
            return Err(BillError::Config(format!(
                "Rate for '{}' must not be negative",
                label
            )));
        }
        let code = currency_code(&label)?.to_string();
        Ok(Self { label, code, rate })
    }
}

impl fmt::Display for CurrencyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Built-in rates into Indian rupees
fn default_rates() -> [(&'static str, Decimal); 11] {
    [
        ("INR (India)", dec!(1)),
        ("EUR (Eurozone)", dec!(92.5)),
        ("AED (UAE)", dec!(22.5)),
        ("AZN (Azerbaijan)", dec!(56)),
        ("SEK (Sweden)", dec!(8.55)),
        ("DKK (Denmark)", dec!(12.41)),
        ("USD (United States)", dec!(83.2)),
        ("GBP (United Kingdom)", dec!(104.7)),
        ("JPY (Japan)", dec!(0.56)),
        ("VND (Vietnam)", dec!(0.0034)),
        ("LKR (Sri Lanka)", dec!(0.27)),
    ]
}

/// Immutable, ordered table of supported currencies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTable {
    entries: Vec<CurrencyEntry>,
}

impl RateTable {
    /// Build a table from `(label, rate)` pairs
    ///
    /// Every label must carry a code, rates must be non-negative, and labels
    /// must be unique.
    pub fn from_pairs<I, S>(pairs: I) -> BillResult<Self>
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for (label, rate) in pairs {
            let entry = CurrencyEntry::new(label, rate)?;
            if !seen.insert(entry.label.clone()) {
                return Err(BillError::Config(format!(
                    "Duplicate currency label: {}",
                    entry.label
                )));
            }
            entries.push(entry);
        }

        if entries.is_empty() {
            return Err(BillError::Config("Rate table has no currencies".into()));
        }

        Ok(Self { entries })
    }

    /// Rate for a label
    pub fn rate_of(&self, label: &str) -> BillResult<Decimal> {
        self.entry(label).map(|e| e.rate)
    }

    /// Currency code for a label
    ///
    /// Parses the label only; it does not need to be in the table.
    pub fn code_of<'a>(&self, label: &'a str) -> BillResult<&'a str> {
        currency_code(label)
    }

    /// Look up an entry by its exact label
    pub fn entry(&self, label: &str) -> BillResult<&CurrencyEntry> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .ok_or_else(|| BillError::UnknownCurrency(label.to_string()))
    }

    /// Look up an entry by code (case-insensitive)
    pub fn find_by_code(&self, code: &str) -> Option<&CurrencyEntry> {
        self.entries
            .iter()
            .find(|e| e.code.eq_ignore_ascii_case(code.trim()))
    }

    /// Resolve a user selection given either as a full label or as a code
    pub fn resolve(&self, selection: &str) -> BillResult<&CurrencyEntry> {
        let selection = selection.trim();
        self.entry(selection).or_else(|err| {
            self.find_by_code(selection).ok_or(err)
        })
    }

    /// All entries, in table order
    pub fn entries(&self) -> &[CurrencyEntry] {
        &self.entries
    }

    /// All labels, in table order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    /// Number of currencies
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty (never true for a constructed table)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RateTable {
    fn default() -> Self {
        let entries = default_rates()
            .into_iter()
            .map(|(label, rate)| CurrencyEntry {
                label: label.to_string(),
                code: label.split(' ').next().unwrap_or(label).to_string(),
                rate,
            })
            .collect();
        Self { entries }
    }
}
