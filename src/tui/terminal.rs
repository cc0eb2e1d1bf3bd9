//! Terminal setup and teardown
//!
//! This module handles initializing and restoring the terminal state,
//! including setting up the panic hook to restore the terminal on crash.

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;

use crate::services::BillService;

use super::app::App;
use super::event::{Event, EventHandler};
use super::form;

/// Type alias for our terminal
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> Result<Tui> {
    // Restore terminal before printing panic info
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal_impl();
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal() -> Result<()> {
    restore_terminal_impl()?;
    Ok(())
}

fn restore_terminal_impl() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Run the bill entry form until the user quits
pub fn run_form(service: &BillService<'_>) -> Result<()> {
    let mut terminal = init_terminal()?;
    let result = event_loop(&mut terminal, service);
    restore_terminal()?;
    result
}

fn event_loop(terminal: &mut Tui, service: &BillService<'_>) -> Result<()> {
    let mut app = App::new(service);
    let events = EventHandler::default();

    loop {
        terminal.draw(|frame| form::render(frame, &app))?;

        match events.next()? {
            Event::Key(key) => {
                form::handle_key(&mut app, key);
            }
            Event::Resize(_, _) => {
                // Redrawn on the next pass
            }
            Event::Tick => app.notifications.remove_expired(),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
