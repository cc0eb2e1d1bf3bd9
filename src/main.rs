use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bill_ledger::cli::{handle_add_command, handle_history_command, handle_rates_command, AddArgs};
use bill_ledger::config::{BillPaths, Settings};
use bill_ledger::services::BillService;
use bill_ledger::storage::HistoryLog;

#[derive(Parser)]
#[command(
    name = "bills",
    author = "Kaylee Beyene",
    version,
    about = "Append bills paid abroad to a spreadsheet ledger",
    long_about = "bill-ledger converts bills paid in foreign currencies to the home \
                  currency and appends them as new rows to an existing xlsx ledger, \
                  copying the formatting of the row above."
)]
struct Cli {
    /// Ledger file to append to
    #[arg(long, global = true, env = "BILL_LEDGER_FILE")]
    ledger: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a bill to the ledger
    Add(AddArgs),

    /// Open the interactive bill form
    #[command(alias = "tui")]
    Form,

    /// Show the currency rate table
    Rates,

    /// Show recently added bills
    History {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// Show current configuration and paths
    Config,
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = BillPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // The form owns the terminal, so log lines would corrupt it
    if !matches!(cli.command, Some(Commands::Form)) {
        init_tracing(&settings);
    }

    let rates = settings.rate_table()?;
    let ledger_path = cli
        .ledger
        .clone()
        .unwrap_or_else(|| settings.ledger_path(&paths));

    let mut service = BillService::new(&rates, ledger_path, settings.ledger_layout())
        .with_home_symbol(settings.home_currency_symbol.clone());
    if settings.history_enabled {
        service = service.with_history(HistoryLog::new(paths.history_log()));
    }

    match cli.command {
        Some(Commands::Add(args)) => {
            handle_add_command(&service, args)?;
        }
        Some(Commands::Form) => {
            bill_ledger::tui::run_form(&service)?;
        }
        Some(Commands::Rates) => {
            handle_rates_command(&rates, &settings.home_currency_symbol);
        }
        Some(Commands::History { limit }) => {
            handle_history_command(&HistoryLog::new(paths.history_log()), limit)?;
        }
        Some(Commands::Config) => {
            println!("bill-ledger Configuration");
            println!("=========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("History log:    {}", paths.history_log().display());
            println!("Ledger file:    {}", service.ledger_path().display());
            println!();
            println!("Settings:");
            println!(
                "  Sheet:            {}",
                settings.sheet_name.as_deref().unwrap_or("(first sheet)")
            );
            println!("  Header rows:      {}", settings.header_rows);
            println!("  Home currency:    {}", settings.home_currency_symbol);
            println!("  History enabled:  {}", settings.history_enabled);
            println!("  Log level:        {}", settings.log_level);
            println!("  Currencies:       {}", rates.len());
        }
        None => {
            println!("bill-ledger - Append bills to a spreadsheet ledger");
            println!();
            println!("Run 'bills --help' for usage information.");
            println!("Run 'bills form' to open the interactive form.");
        }
    }

    Ok(())
}
