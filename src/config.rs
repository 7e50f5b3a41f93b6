//! Runtime configuration resolved from command-line flags and the environment.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::error::AppError;

/// Directory name used under the platform data directory.
pub const APP_DIR_NAME: &str = "efficient-tasks";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    /// Keep tasks in memory only; nothing is read from or written to disk.
    pub ephemeral: bool,
}

impl AppConfig {
    /// Resolve configuration from parsed CLI flags.
    ///
    /// The data directory is `--data-dir`, else the platform data directory,
    /// else `$HOME/.efficient-tasks`.
    pub fn from_cli(cli: &Cli) -> Result<Self, AppError> {
        let data_dir = match cli.data_dir.as_ref() {
            Some(dir) => dir.clone(),
            None => default_data_dir().ok_or(AppError::NoDataDir)?,
        };
        Ok(Self::with_data_dir(
            &data_dir,
            cli.log_level.clone(),
            cli.ephemeral,
        ))
    }

    pub fn with_data_dir(data_dir: &Path, log_level: Option<String>, ephemeral: bool) -> Self {
        AppConfig {
            data_dir: data_dir.to_path_buf(),
            log_dir: data_dir.join("logs"),
            log_level: log_level.unwrap_or_else(|| default_log_level().to_string()),
            ephemeral,
        }
    }
}

fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(format!(".{APP_DIR_NAME}"))))
}

/// Default log level for the current build mode.
///
/// - `debug` builds -> `debug`
/// - `release` builds -> `info`
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_explicit_data_dir_wins() {
        let cli = Cli::parse_from(["et", "--data-dir", "/tmp/et-test", "--log-level", "warn", "list"]);
        let config = AppConfig::from_cli(&cli).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/et-test"));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/et-test/logs"));
        assert_eq!(config.log_level, "warn");
        assert!(!config.ephemeral);
    }

    #[test]
    fn test_log_level_defaults_by_build_mode() {
        let config = AppConfig::with_data_dir(Path::new("/x"), None, true);
        assert_eq!(config.log_level, default_log_level());
        assert!(config.ephemeral);
    }
}
