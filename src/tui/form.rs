//! Bill entry form
//!
//! Six fields with tab navigation. Category and currency are selectors
//! cycled with the arrow keys; the others are free text. Enter submits.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::error::{BillError, BillResult};
use crate::models::bill::DATE_FORMAT;
use crate::models::{parse_amount, parse_date, BillCategory, BillInput, RateTable};
use crate::tui::app::App;
use crate::tui::layout::centered_rect;
use crate::tui::widgets::{NotificationWidget, TextInput};

/// Which field is currently focused in the bill form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Date,
    Category,
    Place,
    Currency,
    Amount,
    Link,
}

impl FormField {
    /// Get the next field (for Tab navigation)
    pub fn next(self) -> Self {
        match self {
            Self::Date => Self::Category,
            Self::Category => Self::Place,
            Self::Place => Self::Currency,
            Self::Currency => Self::Amount,
            Self::Amount => Self::Link,
            Self::Link => Self::Date,
        }
    }

    /// Get the previous field (for Shift+Tab navigation)
    pub fn prev(self) -> Self {
        match self {
            Self::Date => Self::Link,
            Self::Category => Self::Date,
            Self::Place => Self::Category,
            Self::Currency => Self::Place,
            Self::Amount => Self::Currency,
            Self::Link => Self::Amount,
        }
    }

    /// Field label
    pub fn label(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Category => "Category",
            Self::Place => "Place",
            Self::Currency => "Currency",
            Self::Amount => "Amount",
            Self::Link => "Link",
        }
    }

    /// Whether the field picks from a fixed list
    pub fn is_selector(self) -> bool {
        matches!(self, Self::Category | Self::Currency)
    }
}

/// State for the bill form
#[derive(Debug, Clone)]
pub struct BillFormState {
    /// Currently focused field
    pub focused_field: FormField,

    /// Bill date (YYYY-MM-DD)
    pub date_input: TextInput,

    /// Index into [`BillCategory::ALL`]
    pub category_index: usize,

    /// Place input
    pub place_input: TextInput,

    /// Index into the rate table
    pub currency_index: usize,

    /// Foreign amount input
    pub amount_input: TextInput,

    /// Link input
    pub link_input: TextInput,

    /// Inline validation error
    pub error_message: Option<String>,
}

impl BillFormState {
    /// Create an empty form dated `today`
    pub fn new(today: NaiveDate) -> Self {
        let mut state = Self {
            focused_field: FormField::Date,
            date_input: TextInput::new()
                .placeholder("YYYY-MM-DD")
                .content(today.format(DATE_FORMAT).to_string()),
            category_index: 0,
            place_input: TextInput::new().placeholder("Where the bill was paid"),
            currency_index: 0,
            amount_input: TextInput::new().placeholder("0.00"),
            link_input: TextInput::new().placeholder("Link to bill"),
            error_message: None,
        };
        state.update_focus();
        state
    }

    /// Move to the next field
    pub fn next_field(&mut self) {
        self.focused_field = self.focused_field.next();
        self.update_focus();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        self.focused_field = self.focused_field.prev();
        self.update_focus();
    }

    /// Set focus to a specific field
    pub fn set_focus(&mut self, field: FormField) {
        self.focused_field = field;
        self.update_focus();
    }

    fn update_focus(&mut self) {
        self.date_input.focused = self.focused_field == FormField::Date;
        self.place_input.focused = self.focused_field == FormField::Place;
        self.amount_input.focused = self.focused_field == FormField::Amount;
        self.link_input.focused = self.focused_field == FormField::Link;
    }

    /// The focused text input, if the focused field is free text
    pub fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focused_field {
            FormField::Date => Some(&mut self.date_input),
            FormField::Place => Some(&mut self.place_input),
            FormField::Amount => Some(&mut self.amount_input),
            FormField::Link => Some(&mut self.link_input),
            FormField::Category | FormField::Currency => None,
        }
    }

    /// Step the focused selector forward or back, wrapping around
    pub fn cycle(&mut self, forward: bool, currency_count: usize) {
        let (index, len) = match self.focused_field {
            FormField::Category => (&mut self.category_index, BillCategory::ALL.len()),
            FormField::Currency => (&mut self.currency_index, currency_count),
            _ => return,
        };
        if len == 0 {
            return;
        }
        *index = if forward {
            (*index + 1) % len
        } else {
            (*index + len - 1) % len
        };
    }

    /// Selected category
    pub fn category(&self) -> BillCategory {
        BillCategory::ALL[self.category_index % BillCategory::ALL.len()]
    }

    /// Selected currency label
    pub fn currency_label<'r>(&self, rates: &'r RateTable) -> Option<&'r str> {
        rates
            .entries()
            .get(self.currency_index)
            .map(|e| e.label.as_str())
    }

    /// Validate the form and build a submission
    pub fn build_input(&self, rates: &RateTable) -> BillResult<BillInput> {
        let date = parse_date(self.date_input.value())?;

        let amount = self.amount_input.value().trim();
        if amount.is_empty() {
            return Err(BillError::Validation("Enter the amount in foreign currency".into()));
        }
        let amount_foreign = parse_amount(amount)?;

        let currency_label = self
            .currency_label(rates)
            .ok_or_else(|| BillError::Validation("Select a currency".into()))?;

        Ok(BillInput {
            date,
            category: self.category(),
            place: self.place_input.value().trim().to_string(),
            currency_label: currency_label.to_string(),
            amount_foreign,
            link: self.link_input.value().trim().to_string(),
        })
    }

    /// Reset the per-bill fields after a successful submission
    ///
    /// Date, category and currency are kept since consecutive bills usually
    /// share them.
    pub fn clear_after_submit(&mut self) {
        self.place_input.clear();
        self.amount_input.clear();
        self.link_input.clear();
        self.error_message = None;
        self.set_focus(FormField::Place);
    }

    /// Clear any error message
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Set an error message
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error_message = Some(msg.into());
    }
}

/// Render the bill form
pub fn render(frame: &mut Frame, app: &App) {
    let area = centered_rect(70, 80, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Add Bill ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    let inner = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(2),
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Date
            Constraint::Length(1), // Category
            Constraint::Length(1), // Place
            Constraint::Length(1), // Currency
            Constraint::Length(1), // Amount
            Constraint::Length(1), // Link
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Preview
            Constraint::Length(1), // Error
            Constraint::Length(1), // Hints
            Constraint::Min(0),    // Notification
        ])
        .split(inner);

    let form = &app.form;
    let rates = app.service.rates();

    render_text_field(frame, chunks[0], FormField::Date, &form.date_input);
    render_selector(
        frame,
        chunks[1],
        FormField::Category,
        form.category().as_str(),
        form.focused_field == FormField::Category,
    );
    render_text_field(frame, chunks[2], FormField::Place, &form.place_input);
    render_selector(
        frame,
        chunks[3],
        FormField::Currency,
        form.currency_label(rates).unwrap_or("(no currencies)"),
        form.focused_field == FormField::Currency,
    );
    render_text_field(frame, chunks[4], FormField::Amount, &form.amount_input);
    render_text_field(frame, chunks[5], FormField::Link, &form.link_input);

    // Live conversion preview
    if let Ok(record) = form
        .build_input(rates)
        .and_then(|input| app.service.preview(&input))
    {
        let preview = Line::from(vec![
            Span::styled(format!("{:>10}: ", "Converted"), Style::default().fg(Color::Cyan)),
            Span::styled(
                format!(
                    "{:.2} {} = {:.2}",
                    record.amount_foreign, record.currency_code, record.amount_home
                ),
                Style::default().fg(Color::Green),
            ),
        ]);
        frame.render_widget(Paragraph::new(preview), chunks[7]);
    }

    if let Some(ref error) = form.error_message {
        let error_line = Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        ));
        frame.render_widget(Paragraph::new(error_line), chunks[8]);
    }

    let hints = Line::from(vec![
        Span::styled("[Tab]", Style::default().fg(Color::Yellow)),
        Span::raw(" Next  "),
        Span::styled("[Shift+Tab]", Style::default().fg(Color::Yellow)),
        Span::raw(" Prev  "),
        Span::styled("[←/→]", Style::default().fg(Color::Yellow)),
        Span::raw(" Choose  "),
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(" Add Bill  "),
        Span::styled("[Esc]", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ]);
    frame.render_widget(Paragraph::new(hints), chunks[9]);

    if let Some(notification) = app.notifications.current() {
        let area = chunks[10];
        let area = Rect {
            height: area.height.min(5),
            ..area
        };
        if area.height >= 3 {
            frame.render_widget(NotificationWidget::new(notification), area);
        }
    }
}

fn label_span(field: FormField, focused: bool) -> Span<'static> {
    let style = if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    Span::styled(format!("{:>10}: ", field.label()), style)
}

fn render_text_field(frame: &mut Frame, area: Rect, field: FormField, input: &TextInput) {
    let mut spans = vec![label_span(field, input.focused)];

    if input.focused {
        let (before, under, after) = input.split_at_cursor();
        let value_style = Style::default().fg(Color::White);
        spans.push(Span::styled(before.to_string(), value_style));
        spans.push(Span::styled(
            under,
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ));
        spans.push(Span::styled(after.to_string(), value_style));
    } else if input.value().is_empty() {
        spans.push(Span::styled(
            input.placeholder.clone(),
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::styled(
            input.value().to_string(),
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_selector(frame: &mut Frame, area: Rect, field: FormField, value: &str, focused: bool) {
    let value_span = if focused {
        Span::styled(
            format!("< {} >", value),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        )
    } else {
        Span::styled(value.to_string(), Style::default().fg(Color::Yellow))
    };
    let line = Line::from(vec![label_span(field, focused), value_span]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Handle key input for the bill form
/// Returns true if the key was handled, false otherwise
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return true;
    }

    match key.code {
        KeyCode::Esc => {
            app.quit();
            return true;
        }
        KeyCode::Enter => {
            app.submit();
            return true;
        }
        _ => {}
    }

    let currency_count = app.service.rates().len();
    let form = &mut app.form;

    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                form.prev_field();
            } else {
                form.next_field();
            }
            return true;
        }

        KeyCode::BackTab | KeyCode::Up => {
            form.prev_field();
            return true;
        }

        KeyCode::Left | KeyCode::Right => {
            let forward = key.code == KeyCode::Right;
            if form.focused_field.is_selector() {
                form.cycle(forward, currency_count);
            } else if let Some(input) = form.focused_input() {
                if forward {
                    input.move_right();
                } else {
                    input.move_left();
                }
            }
            return true;
        }

        KeyCode::Home => {
            if let Some(input) = form.focused_input() {
                input.move_start();
            }
            return true;
        }

        KeyCode::End => {
            if let Some(input) = form.focused_input() {
                input.move_end();
            }
            return true;
        }

        KeyCode::Backspace => {
            form.clear_error();
            if let Some(input) = form.focused_input() {
                input.backspace();
            }
            return true;
        }

        KeyCode::Delete => {
            form.clear_error();
            if let Some(input) = form.focused_input() {
                input.delete();
            }
            return true;
        }

        KeyCode::Char(' ') if form.focused_field.is_selector() => {
            form.cycle(true, currency_count);
            return true;
        }

        KeyCode::Char(c) => {
            form.clear_error();
            if let Some(input) = form.focused_input() {
                input.insert(c);
                return true;
            }
        }

        _ => {}
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::BillService;
    use crate::storage::{Ledger, LedgerColumn, LedgerLayout};
    use rust_decimal_macros::dec;
    use std::path::Path;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn write_ledger(path: &Path) {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_mut(&0).unwrap();
        for column in LedgerColumn::ALL {
            sheet
                .get_cell_mut((column.number(), 1))
                .set_value_string(column.header());
            sheet
                .get_cell_mut((column.number(), 2))
                .set_value_string("-");
        }
        umya_spreadsheet::writer::xlsx::write(&book, path).unwrap();
    }

    #[test]
    fn test_field_navigation_wraps() {
        let mut form = BillFormState::new(today());
        assert_eq!(form.focused_field, FormField::Date);
        form.prev_field();
        assert_eq!(form.focused_field, FormField::Link);
        assert!(form.link_input.focused);
        form.next_field();
        form.next_field();
        assert_eq!(form.focused_field, FormField::Category);
        assert!(form.focused_input().is_none());
    }

    #[test]
    fn test_selectors_cycle() {
        let mut form = BillFormState::new(today());
        form.set_focus(FormField::Category);
        form.cycle(false, 11);
        assert_eq!(form.category(), BillCategory::Food);
        form.cycle(true, 11);
        form.cycle(true, 11);
        assert_eq!(form.category(), BillCategory::Hotel);

        form.set_focus(FormField::Currency);
        form.cycle(false, 11);
        assert_eq!(form.currency_index, 10);
    }

    #[test]
    fn test_build_input() {
        let rates = RateTable::default();
        let mut form = BillFormState::new(today());
        form.currency_index = 6;
        form.category_index = 1;
        form.place_input = TextInput::new().content(" Paris ");
        form.amount_input = TextInput::new().content("100.00");
        form.link_input = TextInput::new().content("http://x");

        let input = form.build_input(&rates).unwrap();
        assert_eq!(input.date, today());
        assert_eq!(input.category, BillCategory::Hotel);
        assert_eq!(input.place, "Paris");
        assert_eq!(input.currency_label, "USD (United States)");
        assert_eq!(input.amount_foreign, dec!(100.00));
        assert_eq!(input.link, "http://x");
    }

    #[test]
    fn test_build_input_validation() {
        let rates = RateTable::default();
        let mut form = BillFormState::new(today());
        assert!(form.build_input(&rates).unwrap_err().is_validation());

        form.amount_input = TextInput::new().content("-3");
        assert!(form.build_input(&rates).unwrap_err().is_validation());

        form.amount_input = TextInput::new().content("3");
        form.date_input = TextInput::new().content("yesterday");
        assert!(form.build_input(&rates).unwrap_err().is_validation());
    }

    #[test]
    fn test_keyboard_submission() {
        let temp_dir = TempDir::new().unwrap();
        let ledger_path = temp_dir.path().join("my_bills.xlsx");
        write_ledger(&ledger_path);

        let rates = RateTable::default();
        let service = BillService::new(&rates, &ledger_path, LedgerLayout::default());
        let mut app = App::new(&service);
        app.form.date_input = TextInput::new().content("2024-01-15");

        press(&mut app, KeyCode::Tab); // Category
        press(&mut app, KeyCode::Right); // Hotel
        press(&mut app, KeyCode::Tab); // Place
        type_text(&mut app, "Paris");
        press(&mut app, KeyCode::Tab); // Currency
        for _ in 0..6 {
            press(&mut app, KeyCode::Right); // USD
        }
        press(&mut app, KeyCode::Tab); // Amount
        type_text(&mut app, "100");
        press(&mut app, KeyCode::Tab); // Link
        type_text(&mut app, "http://x");

        let receipt = app.submit().unwrap();
        assert_eq!(receipt.row, 3);
        assert_eq!(receipt.record.amount_home, dec!(8320.00));
        assert_eq!(
            app.notifications.current().unwrap().message,
            "Bill added! 100.00 USD = ₹8320.00"
        );

        // Per-bill fields reset, shared fields kept
        assert!(app.form.amount_input.value().is_empty());
        assert_eq!(app.form.category(), BillCategory::Hotel);
        assert_eq!(app.form.focused_field, FormField::Place);

        let ledger = Ledger::open(&ledger_path, LedgerLayout::default()).unwrap();
        let row = ledger.read_row(3).unwrap().unwrap();
        assert_eq!(row.place, "Paris");
        assert_eq!(row.category, "Hotel");
    }

    #[test]
    fn test_missing_ledger_keeps_form_filled() {
        let temp_dir = TempDir::new().unwrap();
        let ledger_path = temp_dir.path().join("my_bills.xlsx");

        let rates = RateTable::default();
        let service = BillService::new(&rates, &ledger_path, LedgerLayout::default());
        let mut app = App::new(&service);
        app.form.amount_input = TextInput::new().content("12");

        assert!(app.submit().is_none());
        assert_eq!(app.form.amount_input.value(), "12");
        assert!(app
            .notifications
            .current()
            .unwrap()
            .message
            .contains("not found"));
    }

    #[test]
    fn test_escape_quits() {
        let rates = RateTable::default();
        let service = BillService::new(&rates, "unused.xlsx", LedgerLayout::default());
        let mut app = App::new(&service);
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }
}
