//! Bill categories
//!
//! The ledger accepts a fixed set of expense categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Expense category of a bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BillCategory {
    #[default]
    Flight,
    Hotel,
    Package,
    Ride,
    Food,
}

impl BillCategory {
    /// All categories, in form order
    pub const ALL: [BillCategory; 5] = [
        Self::Flight,
        Self::Hotel,
        Self::Package,
        Self::Ride,
        Self::Food,
    ];

    /// Name as written to the ledger
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flight => "Flight",
            Self::Hotel => "Hotel",
            Self::Package => "Package",
            Self::Ride => "Ride",
            Self::Food => "Food",
        }
    }

    /// Position in [`BillCategory::ALL`]
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|c| c == self).unwrap_or(0)
    }
}

impl fmt::Display for BillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown category name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown category '{}'. Use one of: Flight, Hotel, Package, Ride, Food",
            self.0
        )
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for BillCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("hotel".parse::<BillCategory>().unwrap(), BillCategory::Hotel);
        assert_eq!(" FOOD ".parse::<BillCategory>().unwrap(), BillCategory::Food);
        assert!("Taxi".parse::<BillCategory>().is_err());
    }

    #[test]
    fn test_display_matches_ledger_names() {
        let names: Vec<String> = BillCategory::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(names, ["Flight", "Hotel", "Package", "Ride", "Food"]);
    }

    #[test]
    fn test_index() {
        assert_eq!(BillCategory::Flight.index(), 0);
        assert_eq!(BillCategory::Food.index(), 4);
    }
}
