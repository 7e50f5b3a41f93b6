//! Top-level errors reported by the CLI before exiting.

use std::io;

use thiserror::Error;

use crate::store::ResolveError;
use crate::task::ValidationError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No task found matching '{0}'")]
    TaskNotFound(String),

    #[error("{0}\nPlease use the task ID instead.")]
    AmbiguousTask(String),

    #[error("failed to initialise logging: {0}")]
    Logging(String),

    #[error("could not determine a data directory; pass --data-dir")]
    NoDataDir,

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

impl From<ResolveError> for AppError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotFound(identifier) => AppError::TaskNotFound(identifier),
            ResolveError::Ambiguous { identifier, matches } => {
                let mut msg = format!("Multiple tasks match '{}':", identifier);
                for (id, description) in matches {
                    msg.push_str(&format!("\n  {}  {}", id, description));
                }
                AppError::AmbiguousTask(msg)
            }
        }
    }
}
