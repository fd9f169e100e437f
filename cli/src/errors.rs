//! CLI error types

use thiserror::Error;

use outpost_client::ClientError;

/// Errors surfaced to the operator. Messages are printed as-is.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Error parsing template: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

pub type CliResult<T> = Result<T, CliError>;
