use thiserror::Error;

/// Transport, decode or shape failure while fetching one page.
/// The sync loop treats every variant as transient for the current run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("Expected a JSON array from {url}, got {found}")]
    UnexpectedShape { url: String, found: &'static str },
}

/// A record that looked finalized but does not match the partner's full schema.
/// Means the upstream contract changed; never retried or skipped.
#[derive(Debug, Error)]
#[error("Record from partner '{partner}' violates its schema: {reason}")]
pub struct SchemaViolation {
    pub partner: String,
    pub reason: String,
}

impl SchemaViolation {
    pub fn new(partner: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaViolation {
            partner: partner.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PartnerError {
    #[error("Unknown partner: {0}")]
    NotFound(String),
}
