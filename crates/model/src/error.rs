use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("Invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("Timestamp out of range: {0}")]
    TimestampOutOfRange(i64),
}
