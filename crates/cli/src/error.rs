use connectors::error::{FetchError, PartnerError};
use engine_core::error::{RunnerError, StateStoreError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("{0}")]
    Partner(#[from] PartnerError),

    #[error("Failed to set up HTTP client: {0}")]
    Http(#[from] FetchError),

    #[error("State store error: {0}")]
    State(#[from] StateStoreError),

    #[error("Sync run failed: {0}")]
    Runner(#[from] RunnerError),

    #[error("{failed} of {total} partner syncs failed")]
    PartialFailure { failed: usize, total: usize },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}
