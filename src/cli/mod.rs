//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod bill;
pub mod history;
pub mod rates;

pub use bill::{handle_add_command, AddArgs};
pub use history::handle_history_command;
pub use rates::handle_rates_command;
