//! User settings for bill-ledger
//!
//! Manages where the ledger lives, how it is laid out, and which currencies
//! the form offers.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::paths::BillPaths;
use crate::error::BillError;
use crate::models::RateTable;
use crate::storage::LedgerLayout;

/// A configured currency, overriding the built-in rate table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySetting {
    /// Display label, e.g. "CHF (Switzerland)"
    pub label: String,
    /// Home-currency units per one unit
    pub rate: Decimal,
}

/// User settings for bill-ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Path to the xlsx ledger (defaults to my_bills.xlsx in the base directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger_path: Option<PathBuf>,

    /// Worksheet holding the ledger (defaults to the first sheet)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_name: Option<String>,

    /// Number of header rows above the first bill
    #[serde(default = "default_header_rows")]
    pub header_rows: u32,

    /// Home currency symbol used in messages
    #[serde(default = "default_home_symbol")]
    pub home_currency_symbol: String,

    /// Default tracing filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether successful submissions are recorded in history.log
    #[serde(default = "default_true")]
    pub history_enabled: bool,

    /// Replacement rate table; the built-in INR table is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currencies: Option<Vec<CurrencySetting>>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_header_rows() -> u32 {
    1
}

fn default_home_symbol() -> String {
    "₹".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            ledger_path: None,
            sheet_name: None,
            header_rows: default_header_rows(),
            home_currency_symbol: default_home_symbol(),
            log_level: default_log_level(),
            history_enabled: true,
            currencies: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &BillPaths) -> Result<Self, BillError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| BillError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BillError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BillPaths) -> Result<(), BillError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| BillError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BillError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Build the rate table, validating any configured currencies
    pub fn rate_table(&self) -> Result<RateTable, BillError> {
        match &self.currencies {
            Some(currencies) => RateTable::from_pairs(
                currencies.iter().map(|c| (c.label.clone(), c.rate)),
            ),
            None => Ok(RateTable::default()),
        }
    }

    /// Resolve the ledger path against the base directory
    pub fn ledger_path(&self, paths: &BillPaths) -> PathBuf {
        match &self.ledger_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => paths.base_dir().join(path),
            None => paths.default_ledger_file(),
        }
    }

    /// Sheet layout of the ledger
    pub fn ledger_layout(&self) -> LedgerLayout {
        LedgerLayout {
            sheet_name: self.sheet_name.clone(),
            header_rows: self.header_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.header_rows, 1);
        assert_eq!(settings.home_currency_symbol, "₹");
        assert!(settings.history_enabled);
        assert_eq!(settings.rate_table().unwrap(), RateTable::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BillPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings {
            sheet_name: Some("Bills".into()),
            header_rows: 2,
            ..Settings::default()
        };
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.sheet_name.as_deref(), Some("Bills"));
        assert_eq!(loaded.header_rows, 2);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.schema_version, 1);
        assert_eq!(settings.log_level, "warn");
        assert!(settings.currencies.is_none());
    }

    #[test]
    fn test_configured_currencies() {
        let settings: Settings = serde_json::from_str(
            r#"{"currencies": [{"label": "CHF (Switzerland)", "rate": "95.1"}]}"#,
        )
        .unwrap();
        let table = settings.rate_table().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rate_of("CHF (Switzerland)").unwrap(), dec!(95.1));
    }

    #[test]
    fn test_configured_currency_without_code_is_rejected() {
        let settings = Settings {
            currencies: Some(vec![CurrencySetting {
                label: "Swiss".into(),
                rate: dec!(95),
            }]),
            ..Settings::default()
        };
        assert!(matches!(
            settings.rate_table(),
            Err(BillError::MalformedLabel(_))
        ));
    }

    #[test]
    fn test_ledger_path_resolution() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BillPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        assert_eq!(settings.ledger_path(&paths), paths.default_ledger_file());

        settings.ledger_path = Some(PathBuf::from("trips/2024.xlsx"));
        assert_eq!(
            settings.ledger_path(&paths),
            temp_dir.path().join("trips/2024.xlsx")
        );
    }
}
