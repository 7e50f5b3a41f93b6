//! # ET - Efficient Task Manager
//!
//! A terminal task tracker that keeps personal and work to-dos apart, with an
//! interactive user interface (TUI) and a scriptable command line over the same
//! task store.
//!
//! ## Key Features
//!
//! - **Two Categories**: Personal and Work tabs, each with its own view
//! - **Filtering and Search**: status filter, live case-insensitive description search
//! - **Due Dates**: natural-language entry, optional due date sorting, overdue and due-soon highlighting
//! - **Completion Ordering**: pending tasks always list above completed ones
//! - **Local File Storage**: one JSON document, rewritten after every change
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the TUI
//! et
//!
//! # Add a task via CLI
//! et add "Book dentist" --due friday --category personal
//!
//! # List pending work tasks, soonest first
//! et list --category work --status pending --sort asc
//!
//! # Toggle or delete by ID prefix or description
//! et toggle 3f2a
//! et delete "Book dentist"
//! ```
//!
//! Data is stored in `efficient-tasks.json` under the platform data directory
//! (for example `~/.local/share/efficient-tasks/` on Linux) unless `--data-dir`
//! is given. Logs are written to the `logs/` directory next to it.

use clap::Parser;
use log::{error, warn};

pub mod cli;
pub mod cmd;
pub mod config;
pub mod dates;
pub mod db;
pub mod error;
pub mod fields;
pub mod logging;
pub mod store;
pub mod task;
pub mod view;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::AppConfig;
use db::{FileStore, KeyValueStore, LoadStatus, MemoryStore};
use error::AppError;
use store::TaskStore;

fn main() {
    let cli = Cli::parse();

    // Completions need neither the store nor the logger.
    if let Some(Commands::Completions { shell }) = &cli.command {
        cmd_completions(*shell);
        return;
    }

    if let Err(e) = run(cli) {
        error!("event=command_failed error={}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = AppConfig::from_cli(&cli)?;
    let _logger = logging::init_logging(&config.log_level, &config.log_dir)?;

    let backend: Box<dyn KeyValueStore> = if config.ephemeral {
        Box::new(MemoryStore::new())
    } else {
        Box::new(FileStore::new(&config.data_dir))
    };
    let mut store = TaskStore::open(backend);
    if let LoadStatus::Failed(reason) = store.load_status() {
        warn!("event=load_fallback reason={}", reason);
    }

    match cli.command.unwrap_or(Commands::Ui) {
        Commands::Ui => cmd_ui(store),

        Commands::Add { description, due, category } => cmd_add(&mut store, description, due, category),

        Commands::List { category, status, sort, search } => {
            cmd_list(&mut store, category, status, sort, search);
            Ok(())
        }

        Commands::Update { task, desc, category, due } => cmd_update(&mut store, task, desc, category, due),

        Commands::Toggle { task } => cmd_toggle(&mut store, task),

        Commands::Delete { task } => cmd_delete(&mut store, task),

        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    }
}
