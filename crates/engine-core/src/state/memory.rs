use crate::{
    error::StateStoreError,
    state::{CursorStore, models::CursorCheckpoint},
};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;

/// Process-local store, for tests and dry runs.
#[derive(Default)]
pub struct MemoryCursorStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    latest: BTreeMap<String, CursorCheckpoint>,
    history: HashMap<String, Vec<CursorCheckpoint>>,
}

impl MemoryCursorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CursorStore for MemoryCursorStore {
    async fn save_checkpoint(&self, cp: &CursorCheckpoint) -> Result<(), StateStoreError> {
        let mut inner = self.inner.lock().await;
        inner.latest.insert(cp.partner_id.clone(), cp.clone());
        inner
            .history
            .entry(cp.partner_id.clone())
            .or_default()
            .push(cp.clone());
        Ok(())
    }

    async fn load_checkpoint(
        &self,
        partner_id: &str,
    ) -> Result<Option<CursorCheckpoint>, StateStoreError> {
        Ok(self.inner.lock().await.latest.get(partner_id).cloned())
    }

    async fn clear_checkpoint(&self, partner_id: &str) -> Result<bool, StateStoreError> {
        Ok(self.inner.lock().await.latest.remove(partner_id).is_some())
    }

    async fn list_checkpoints(&self) -> Result<Vec<CursorCheckpoint>, StateStoreError> {
        Ok(self.inner.lock().await.latest.values().cloned().collect())
    }

    async fn history(&self, partner_id: &str) -> Result<Vec<CursorCheckpoint>, StateStoreError> {
        Ok(self
            .inner
            .lock()
            .await
            .history
            .get(partner_id)
            .cloned()
            .unwrap_or_default())
    }
}
