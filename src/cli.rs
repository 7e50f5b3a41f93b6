use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Personal and work task tracker.
/// Tasks are stored under the platform data directory or the path passed via --data-dir.
#[derive(Parser)]
#[command(name = "et", version, about = "Efficient task manager for the terminal")]
pub struct Cli {
    /// Directory holding the task store and logs.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level: trace | debug | info | warn | error | off.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Keep tasks in memory for this session only.
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Defaults to the interactive UI.
    #[command(subcommand)]
    pub command: Option<Commands>,
}
