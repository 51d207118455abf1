use crate::{error::SchemaViolation, http::PageRequest};
use chrono::Duration;
use model::{
    pagination::cursor::CursorKind, records::transaction::CanonicalTransaction,
    sync::result::Credentials,
};
use serde_json::Value;

pub mod changenow;
pub mod godex;
pub mod registry;

/// Per-partner tuning the engine merges into its settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartnerDefaults {
    /// Offset rollback applied at the end of a run.
    pub rollback: u64,
    /// How far back a first watermark sync reaches.
    pub lookback: Duration,
}

impl Default for PartnerDefaults {
    fn default() -> Self {
        Self {
            rollback: 0,
            lookback: Duration::days(5),
        }
    }
}

/// One upstream exchange partner: how to address its listing endpoint and
/// how to turn its raw records into canonical transactions.
pub trait Partner: Send + Sync {
    fn id(&self) -> &'static str;

    /// Human readable name for logs and listings.
    fn name(&self) -> &'static str;

    fn cursor_kind(&self) -> CursorKind;

    fn defaults(&self) -> PartnerDefaults {
        PartnerDefaults::default()
    }

    /// Key in the credentials map holding the API key.
    fn credential_key(&self) -> &'static str;

    /// Environment variable the CLI reads the API key from.
    fn credential_env(&self) -> &'static str;

    fn page_request(&self, api_key: &str, limit: usize, offset: u64) -> PageRequest;

    /// Validates one raw record and maps it. `Ok(None)` means the record is
    /// not a finalized transaction and is skipped.
    fn normalize(&self, raw: &Value) -> Result<Option<CanonicalTransaction>, SchemaViolation>;

    fn api_key<'a>(&self, credentials: &'a Credentials) -> Option<&'a str> {
        credentials
            .get(self.credential_key())
            .map(String::as_str)
            .filter(|key| !key.trim().is_empty())
    }
}
