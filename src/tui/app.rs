//! Application state for the TUI
//!
//! The App struct holds all state needed for rendering and handling events.

use chrono::Local;

use crate::services::{BillService, SubmissionReceipt};

use super::form::BillFormState;
use super::widgets::{Notification, NotificationQueue};

/// Main application state
pub struct App<'a> {
    /// Service bills are submitted to
    pub service: &'a BillService<'a>,

    /// The bill form
    pub form: BillFormState,

    /// Outcome of recent submissions
    pub notifications: NotificationQueue,

    /// Whether the app should quit
    pub should_quit: bool,
}

impl<'a> App<'a> {
    /// Create the app with an empty form dated today
    pub fn new(service: &'a BillService<'a>) -> Self {
        Self {
            service,
            form: BillFormState::new(Local::now().date_naive()),
            notifications: NotificationQueue::new(),
            should_quit: false,
        }
    }

    /// Request the app to quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Submit the form
    ///
    /// Input errors stay inline on the form. Ledger errors become a
    /// notification and leave the form filled so the user can retry.
    pub fn submit(&mut self) -> Option<SubmissionReceipt> {
        self.form.clear_error();

        let input = match self.form.build_input(self.service.rates()) {
            Ok(input) => input,
            Err(e) => {
                self.form.set_error(e.to_string());
                return None;
            }
        };

        match self.service.submit(&input) {
            Ok(receipt) => {
                self.notifications.push(Notification::success(receipt.message()));
                self.form.clear_after_submit();
                Some(receipt)
            }
            Err(e) => {
                self.notifications.push(Notification::from_error(&e));
                None
            }
        }
    }
}
