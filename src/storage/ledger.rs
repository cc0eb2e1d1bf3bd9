//! Spreadsheet ledger
//!
//! The ledger is an existing xlsx workbook. Bills occupy columns B through H
//! of the ledger sheet, one row per bill, below one or more header rows.
//! Every appended row takes its formatting from the row above it, so the
//! template row the user formatted once carries down the whole sheet.

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info};
use umya_spreadsheet::{Spreadsheet, Style, Worksheet};

use super::file_io::{read_workbook, write_workbook_atomic};
use super::lock::ensure_available;
use crate::error::{BillError, BillResult};
use crate::models::bill::DATE_FORMAT;
use crate::models::BillRecord;

/// 1-based row number in the ledger sheet
pub type RowIndex = u32;

/// Number format applied to date cells whose template format is General
pub const DATE_NUMBER_FORMAT: &str = "yyyy-mm-dd";

/// Ledger columns, in sheet order starting at column B
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerColumn {
    Date,
    Category,
    Place,
    CurrencyCode,
    AmountForeign,
    AmountHome,
    Link,
}

impl LedgerColumn {
    /// All columns, in sheet order
    pub const ALL: [LedgerColumn; 7] = [
        Self::Date,
        Self::Category,
        Self::Place,
        Self::CurrencyCode,
        Self::AmountForeign,
        Self::AmountHome,
        Self::Link,
    ];

    /// Sheet column of the first ledger column (B)
    pub const FIRST: u32 = 2;

    /// 1-based sheet column number
    pub fn number(self) -> u32 {
        let offset = Self::ALL.iter().position(|c| *c == self).unwrap_or(0) as u32;
        Self::FIRST + offset
    }

    /// Conventional header text
    pub fn header(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Category => "Category",
            Self::Place => "Place",
            Self::CurrencyCode => "Currency",
            Self::AmountForeign => "Amount",
            Self::AmountHome => "Amount (Home)",
            Self::Link => "Link",
        }
    }
}

/// Where the bills live inside the workbook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerLayout {
    /// Worksheet name; the first worksheet when `None`
    pub sheet_name: Option<String>,
    /// Rows above the first bill that are never used as a template
    pub header_rows: u32,
}

impl Default for LedgerLayout {
    fn default() -> Self {
        Self {
            sheet_name: None,
            header_rows: 1,
        }
    }
}

/// Styles of the ledger columns of one row
///
/// Captured from the template row and applied to the row being appended.
/// Only formatting is carried (font, border, fill, number format,
/// protection, alignment), never values.
#[derive(Debug, Clone)]
pub struct RowStyle {
    source_row: RowIndex,
    styles: Vec<Style>,
}

impl RowStyle {
    /// Snapshot the styles of `row`
    pub fn capture(sheet: &Worksheet, row: RowIndex) -> Self {
        let styles = LedgerColumn::ALL
            .iter()
            .map(|column| {
                sheet
                    .get_cell((column.number(), row))
                    .map(|cell| cell.get_style().clone())
                    .unwrap_or_default()
            })
            .collect();

        Self {
            source_row: row,
            styles,
        }
    }

    /// Apply the captured styles to `row`, leaving values untouched
    pub fn apply(&self, sheet: &mut Worksheet, row: RowIndex) {
        for (column, style) in LedgerColumn::ALL.iter().zip(&self.styles) {
            sheet
                .get_cell_mut((column.number(), row))
                .set_style(style.clone());
        }
    }

    /// Row the styles were captured from
    pub fn source_row(&self) -> RowIndex {
        self.source_row
    }

    /// Captured style of one column
    pub fn style(&self, column: LedgerColumn) -> Option<&Style> {
        LedgerColumn::ALL
            .iter()
            .position(|c| *c == column)
            .and_then(|i| self.styles.get(i))
    }
}

/// Values of one ledger row, as stored in the sheet
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRow {
    pub date: Option<NaiveDate>,
    pub category: String,
    pub place: String,
    pub currency_code: String,
    pub amount_foreign: Option<f64>,
    pub amount_home: Option<f64>,
    pub link: String,
}

fn excel_epoch() -> NaiveDate {
    // 1899-12-30 absorbs the 1900 leap-year quirk for all modern dates
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default()
}

/// Excel serial day number of a date
pub fn date_to_serial(date: NaiveDate) -> f64 {
    (date - excel_epoch()).num_days() as f64
}

/// Date of an Excel serial day number (time of day is dropped)
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    Duration::try_days(serial.floor() as i64)
        .and_then(|days| excel_epoch().checked_add_signed(days))
}

fn decimal_to_cell(value: Decimal) -> BillResult<f64> {
    value
        .to_f64()
        .ok_or_else(|| BillError::Validation(format!("Amount out of range: {}", value)))
}

/// An opened xlsx ledger
pub struct Ledger {
    path: PathBuf,
    layout: LedgerLayout,
    book: Spreadsheet,
}

impl Ledger {
    /// Open an existing ledger for appending
    ///
    /// Fails with `LedgerNotFound` if the file is missing (it is never
    /// created) and with `LedgerLocked` if another program holds it.
    pub fn open(path: impl AsRef<Path>, layout: LedgerLayout) -> BillResult<Self> {
        let path = path.as_ref().to_path_buf();
        ensure_available(&path)?;

        let book = read_workbook(&path)?;
        let ledger = Self { path, layout, book };

        // Surface a missing sheet at open time
        ledger.sheet()?;
        debug!(path = %ledger.path.display(), "opened ledger");

        Ok(ledger)
    }

    /// Path of the ledger file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Layout the ledger was opened with
    pub fn layout(&self) -> &LedgerLayout {
        &self.layout
    }

    fn sheet(&self) -> BillResult<&Worksheet> {
        let sheet = match &self.layout.sheet_name {
            Some(name) => self.book.get_sheet_by_name(name),
            None => self.book.get_sheet(&0),
        };
        sheet.ok_or_else(|| self.missing_sheet())
    }

    fn missing_sheet(&self) -> BillError {
        match &self.layout.sheet_name {
            Some(name) => BillError::Config(format!(
                "Worksheet '{}' not found in {}",
                name,
                self.path.display()
            )),
            None => BillError::Spreadsheet(format!(
                "{} contains no worksheets",
                self.path.display()
            )),
        }
    }

    /// Last used row (0 for an empty sheet)
    pub fn last_row(&self) -> BillResult<RowIndex> {
        Ok(self.sheet()?.get_highest_row())
    }

    /// Number of bill rows below the header
    pub fn bill_count(&self) -> BillResult<u32> {
        Ok(self.last_row()?.saturating_sub(self.layout.header_rows))
    }

    /// Styles of the row the next append will copy
    ///
    /// Fails with `NoTemplateRow` when the sheet holds nothing below its
    /// header rows.
    pub fn template_row(&self) -> BillResult<RowStyle> {
        let last = self.last_row()?;
        if last <= self.layout.header_rows {
            return Err(BillError::NoTemplateRow {
                path: self.path.clone(),
            });
        }
        Ok(RowStyle::capture(self.sheet()?, last))
    }

    /// Append a bill below the last row and save the workbook
    ///
    /// Copies the style of the previous row onto the new row, writes the
    /// seven bill cells and persists before returning the new row number.
    /// The row is staged on a copy of the workbook, so a failed save leaves
    /// this ledger exactly as it was on disk.
    pub fn append_bill(&mut self, record: &BillRecord) -> BillResult<RowIndex> {
        ensure_available(&self.path)?;

        let template = self.template_row()?;
        let row = template.source_row() + 1;

        let amount_foreign = decimal_to_cell(record.amount_foreign)?;
        let amount_home = decimal_to_cell(record.amount_home)?;

        let mut staged = self.book.clone();
        let sheet = match &self.layout.sheet_name {
            Some(name) => staged.get_sheet_by_name_mut(name),
            None => staged.get_sheet_mut(&0),
        }
        .ok_or_else(|| self.missing_sheet())?;
        template.apply(sheet, row);
        debug!(from = template.source_row(), to = row, "copied row style");

        let date_cell = sheet.get_cell_mut((LedgerColumn::Date.number(), row));
        date_cell.set_value_number(date_to_serial(record.date));
        let uses_general = date_cell
            .get_style()
            .get_number_format()
            .map_or(true, |f| f.get_format_code() == "General");
        if uses_general {
            date_cell
                .get_style_mut()
                .get_number_format_mut()
                .set_format_code(DATE_NUMBER_FORMAT);
        }

        sheet
            .get_cell_mut((LedgerColumn::Category.number(), row))
            .set_value_string(record.category.as_str());
        sheet
            .get_cell_mut((LedgerColumn::Place.number(), row))
            .set_value_string(record.place.as_str());
        sheet
            .get_cell_mut((LedgerColumn::CurrencyCode.number(), row))
            .set_value_string(record.currency_code.as_str());
        sheet
            .get_cell_mut((LedgerColumn::AmountForeign.number(), row))
            .set_value_number(amount_foreign);
        sheet
            .get_cell_mut((LedgerColumn::AmountHome.number(), row))
            .set_value_number(amount_home);
        sheet
            .get_cell_mut((LedgerColumn::Link.number(), row))
            .set_value_string(record.link.as_str());

        write_workbook_atomic(&self.path, &staged)?;
        self.book = staged;

        info!(
            path = %self.path.display(),
            row,
            currency = %record.currency_code,
            amount_home = %record.amount_home,
            "appended bill"
        );

        Ok(row)
    }

    /// Read back the bill columns of a row
    pub fn read_row(&self, row: RowIndex) -> BillResult<Option<LedgerRow>> {
        let sheet = self.sheet()?;
        if row == 0 || row > sheet.get_highest_row() {
            return Ok(None);
        }

        let text = |column: LedgerColumn| {
            sheet
                .get_cell((column.number(), row))
                .map(|cell| cell.get_value().to_string())
                .unwrap_or_default()
        };
        let number = |column: LedgerColumn| {
            sheet
                .get_cell((column.number(), row))
                .and_then(|cell| cell.get_value_number())
        };

        let date = number(LedgerColumn::Date)
            .and_then(serial_to_date)
            .or_else(|| NaiveDate::parse_from_str(&text(LedgerColumn::Date), DATE_FORMAT).ok());

        Ok(Some(LedgerRow {
            date,
            category: text(LedgerColumn::Category),
            place: text(LedgerColumn::Place),
            currency_code: text(LedgerColumn::CurrencyCode),
            amount_foreign: number(LedgerColumn::AmountForeign),
            amount_home: number(LedgerColumn::AmountHome),
            link: text(LedgerColumn::Link),
        }))
    }
}

/// Open the ledger at `path` and append one bill
pub fn append_bill(
    path: impl AsRef<Path>,
    layout: LedgerLayout,
    record: &BillRecord,
) -> BillResult<RowIndex> {
    Ledger::open(path, layout)?.append_bill(record)
}
