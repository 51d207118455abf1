use crate::{
    error::StateStoreError,
    state::{CursorStore, models::CursorCheckpoint},
};
use async_trait::async_trait;
use std::path::Path;

pub struct SledCursorStore {
    db: sled::Db,
}

impl SledCursorStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StateStoreError> {
        let db = sled::open(path).map_err(|e| StateStoreError::Open(e.to_string()))?;
        Ok(Self { db })
    }

    #[inline]
    fn chk_key(partner_id: &str) -> String {
        format!("chk:{}", partner_id)
    }

    #[inline]
    fn hist_prefix(partner_id: &str) -> String {
        format!("hist:{}:", partner_id)
    }
}

#[async_trait]
impl CursorStore for SledCursorStore {
    async fn save_checkpoint(&self, cp: &CursorCheckpoint) -> Result<(), StateStoreError> {
        let bytes = bincode::serialize(cp)?;

        self.db
            .insert(Self::chk_key(&cp.partner_id), bytes.as_slice())
            .map_err(|e| StateStoreError::SaveCheckpoint(e.to_string()))?;

        // Zero-padded so lexical order matches time order.
        let seq = cp.updated_at.timestamp_nanos_opt().unwrap_or(0);
        let hist_key = format!("{}{:020}", Self::hist_prefix(&cp.partner_id), seq);
        self.db
            .insert(hist_key, bytes)
            .map_err(|e| StateStoreError::AppendHistory(e.to_string()))?;

        self.db
            .flush_async()
            .await
            .map_err(|e| StateStoreError::SaveCheckpoint(e.to_string()))?;
        Ok(())
    }

    async fn load_checkpoint(
        &self,
        partner_id: &str,
    ) -> Result<Option<CursorCheckpoint>, StateStoreError> {
        let found = self
            .db
            .get(Self::chk_key(partner_id))
            .map_err(|e| StateStoreError::LoadCheckpoint(e.to_string()))?;
        match found {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn clear_checkpoint(&self, partner_id: &str) -> Result<bool, StateStoreError> {
        let removed = self
            .db
            .remove(Self::chk_key(partner_id))
            .map_err(|e| StateStoreError::SaveCheckpoint(e.to_string()))?;
        self.db
            .flush_async()
            .await
            .map_err(|e| StateStoreError::SaveCheckpoint(e.to_string()))?;
        Ok(removed.is_some())
    }

    async fn list_checkpoints(&self) -> Result<Vec<CursorCheckpoint>, StateStoreError> {
        let mut out = Vec::new();
        for item in self.db.scan_prefix("chk:") {
            let (_key, value) = item.map_err(|e| StateStoreError::LoadCheckpoint(e.to_string()))?;
            out.push(bincode::deserialize(&value)?);
        }
        Ok(out)
    }

    async fn history(&self, partner_id: &str) -> Result<Vec<CursorCheckpoint>, StateStoreError> {
        let mut entries = Vec::new();
        for item in self.db.scan_prefix(Self::hist_prefix(partner_id)) {
            let (_key, value) =
                item.map_err(|e| StateStoreError::IterateHistory(e.to_string()))?;
            entries.push(bincode::deserialize(&value)?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::LoopState;
    use model::pagination::cursor::Cursor;
    use tempfile::tempdir;

    fn mk_cp(partner: &str, cursor: Cursor, secs: i64) -> CursorCheckpoint {
        CursorCheckpoint {
            run_id: format!("run-{secs}"),
            partner_id: partner.into(),
            cursor,
            transactions: 3,
            pages: 1,
            state: LoopState::StoppedExhausted,
            updated_at: chrono::DateTime::from_timestamp(secs, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn latest_checkpoint_wins() {
        let dir = tempdir().unwrap();
        let store = SledCursorStore::open(dir.path()).unwrap();

        store
            .save_checkpoint(&mk_cp("changenow", Cursor::Offset { offset: 100 }, 10))
            .await
            .unwrap();
        store
            .save_checkpoint(&mk_cp("changenow", Cursor::Offset { offset: 600 }, 20))
            .await
            .unwrap();

        let cp = store.load_checkpoint("changenow").await.unwrap().unwrap();
        assert_eq!(cp.cursor, Cursor::Offset { offset: 600 });

        let hist = store.history("changenow").await.unwrap();
        assert_eq!(hist.len(), 2);
        assert_eq!(hist[0].run_id, "run-10");
        assert_eq!(hist[1].run_id, "run-20");
    }

    #[tokio::test]
    async fn partners_are_isolated_and_clearable() {
        let dir = tempdir().unwrap();
        let store = SledCursorStore::open(dir.path()).unwrap();

        store
            .save_checkpoint(&mk_cp("changenow", Cursor::Offset { offset: 5 }, 1))
            .await
            .unwrap();
        store
            .save_checkpoint(&mk_cp("godex", Cursor::Watermark { timestamp: 77 }, 2))
            .await
            .unwrap();

        assert_eq!(store.list_checkpoints().await.unwrap().len(), 2);
        assert!(store.clear_checkpoint("godex").await.unwrap());
        assert!(!store.clear_checkpoint("godex").await.unwrap());
        assert!(store.load_checkpoint("godex").await.unwrap().is_none());
        assert!(store.load_checkpoint("changenow").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = SledCursorStore::open(dir.path()).unwrap();
            store
                .save_checkpoint(&mk_cp("godex", Cursor::Watermark { timestamp: 9 }, 3))
                .await
                .unwrap();
        }
        let store = SledCursorStore::open(dir.path()).unwrap();
        let cp = store.load_checkpoint("godex").await.unwrap().unwrap();
        assert_eq!(cp.cursor, Cursor::Watermark { timestamp: 9 });
    }
}
