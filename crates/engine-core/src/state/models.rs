use crate::engine::LoopState;
use chrono::{DateTime, Utc};
use model::pagination::cursor::Cursor;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CursorCheckpoint {
    pub run_id: String,
    pub partner_id: String,
    pub cursor: Cursor,
    pub transactions: u64,
    pub pages: u64,
    pub state: LoopState,
    pub updated_at: DateTime<Utc>,
}
