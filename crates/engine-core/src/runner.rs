use crate::{
    engine::{LoopState, SyncEngine, SyncOutcome},
    error::RunnerError,
    settings::SyncSettings,
    state::{CursorStore, models::CursorCheckpoint},
};
use connectors::{http::PageFetcher, partner::Partner};
use model::sync::result::Credentials;
use std::sync::Arc;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

/// Outer loop around [`SyncEngine`]: loads the persisted cursor, runs the
/// partner and stores the cursor it returns.
pub struct SyncRunner {
    store: Arc<dyn CursorStore>,
    fetcher: Arc<dyn PageFetcher>,
}

impl SyncRunner {
    pub fn new(store: Arc<dyn CursorStore>, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { store, fetcher }
    }

    /// Nothing is persisted when the run fails or the partner is not configured.
    pub async fn run_partner(
        &self,
        partner: Arc<dyn Partner>,
        settings: SyncSettings,
        credentials: &Credentials,
    ) -> Result<SyncOutcome, RunnerError> {
        let run_id = Uuid::new_v4().to_string();
        let span = info_span!("sync_run", run_id = %run_id, partner = partner.id());
        self.run_once(run_id, partner, settings, credentials)
            .instrument(span)
            .await
    }

    async fn run_once(
        &self,
        run_id: String,
        partner: Arc<dyn Partner>,
        settings: SyncSettings,
        credentials: &Credentials,
    ) -> Result<SyncOutcome, RunnerError> {
        let cursor = self
            .store
            .load_checkpoint(partner.id())
            .await?
            .map(|cp| cp.cursor);

        let engine = SyncEngine::new(partner.clone(), self.fetcher.clone()).with_settings(settings);
        let outcome = engine.run(credentials, cursor).await?;

        if outcome.state == LoopState::NotConfigured {
            return Ok(outcome);
        }

        let checkpoint = CursorCheckpoint {
            run_id,
            partner_id: partner.id().to_string(),
            cursor: outcome.result.cursor,
            transactions: outcome.result.transactions.len() as u64,
            pages: outcome.pages_fetched as u64,
            state: outcome.state,
            updated_at: chrono::Utc::now(),
        };
        self.store.save_checkpoint(&checkpoint).await?;
        info!(cursor = %checkpoint.cursor, "Checkpoint saved.");

        Ok(outcome)
    }
}
