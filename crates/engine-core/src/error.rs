use connectors::error::SchemaViolation;
use model::pagination::cursor::CursorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Schema violation on page at offset {offset}: {source}")]
    SchemaViolation {
        offset: u64,
        #[source]
        source: SchemaViolation,
    },

    #[error("Partner '{partner}' expects a {expected} cursor but got a {found} cursor")]
    CursorMismatch {
        partner: String,
        expected: CursorKind,
        found: CursorKind,
    },

    #[error("Invalid sync settings: {0}")]
    InvalidSettings(String),
}

#[derive(Error, Debug)]
pub enum StateStoreError {
    #[error("Failed to open state store: {0}")]
    Open(String),

    #[error("Failed to save checkpoint: {0}")]
    SaveCheckpoint(String),

    #[error("Failed to load checkpoint: {0}")]
    LoadCheckpoint(String),

    #[error("Failed to append history entry: {0}")]
    AppendHistory(String),

    #[error("Failed to iterate history: {0}")]
    IterateHistory(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Sync failed: {0}")]
    Sync(#[from] SyncError),

    #[error("State store error: {0}")]
    State(#[from] StateStoreError),
}
