//! Terminal user interface
//!
//! A single bill entry form built on ratatui. Submissions go through the
//! same [`BillService`](crate::services::BillService) as the CLI.

pub mod app;
pub mod event;
pub mod form;
pub mod terminal;

// Widgets
pub mod widgets;

// Layout
pub mod layout;

pub use app::App;
pub use terminal::run_form;
