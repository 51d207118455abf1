use crate::{error::StateStoreError, state::models::CursorCheckpoint};
use async_trait::async_trait;

pub mod memory;
pub mod models;
pub mod sled_store;

/// Persists the cursor each partner resumes from, plus a history of runs.
#[async_trait]
pub trait CursorStore: Send + Sync {
    async fn save_checkpoint(&self, cp: &CursorCheckpoint) -> Result<(), StateStoreError>;
    async fn load_checkpoint(
        &self,
        partner_id: &str,
    ) -> Result<Option<CursorCheckpoint>, StateStoreError>;
    /// Removes the checkpoint; returns whether one existed.
    async fn clear_checkpoint(&self, partner_id: &str) -> Result<bool, StateStoreError>;
    async fn list_checkpoints(&self) -> Result<Vec<CursorCheckpoint>, StateStoreError>;
    async fn history(&self, partner_id: &str) -> Result<Vec<CursorCheckpoint>, StateStoreError>;
}
