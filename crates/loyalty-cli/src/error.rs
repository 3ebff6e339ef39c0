//! CLI error types

use loyalty_types::RewardError;
use thiserror::Error;

/// CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("{0}")]
    Reward(#[from] RewardError),

    #[error("Invalid command '{0}'")]
    UnknownCommand(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("line {line}: {command}: {source}")]
    CommandFailed {
        line: usize,
        command: String,
        source: Box<CliError>,
    },

    #[error("{failed} of {total} commands failed")]
    ScriptFailed { failed: usize, total: usize },
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
