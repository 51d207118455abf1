use crate::{pagination::cursor::Cursor, records::transaction::CanonicalTransaction};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Partner credentials keyed by the names each partner expects (`apiKey`, ...).
pub type Credentials = HashMap<String, String>;

/// What a connector run hands back to its caller for persisting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncResult {
    pub cursor: Cursor,
    pub transactions: Vec<CanonicalTransaction>,
}

impl SyncResult {
    pub fn new(cursor: Cursor, transactions: Vec<CanonicalTransaction>) -> Self {
        SyncResult {
            cursor,
            transactions,
        }
    }

    /// No-op result: cursor passed through, nothing emitted.
    pub fn empty(cursor: Cursor) -> Self {
        SyncResult {
            cursor,
            transactions: Vec::new(),
        }
    }
}
