//! Core data models for bill-ledger
//!
//! This module contains the data structures of the expense-entry domain:
//! currencies and their rates, bill categories, and bill records.

pub mod bill;
pub mod category;
pub mod currency;

pub use bill::{parse_amount, parse_date, BillInput, BillRecord};
pub use category::BillCategory;
pub use currency::{convert, currency_code, CurrencyEntry, RateTable};
