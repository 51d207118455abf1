use crate::{
    error::SyncError,
    settings::SyncSettings,
    tracker::{CursorTracker, Placement},
};
use chrono::{DateTime, Utc};
use connectors::{http::PageFetcher, partner::Partner};
use model::{
    pagination::{cursor::Cursor, page::Page},
    sync::result::{Credentials, SyncResult},
};
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};
use tracing::{debug, error, info, instrument, warn};

/// Where the pagination loop ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopState {
    Fetching,
    /// Last page was shorter than the page size.
    StoppedExhausted,
    /// A page reached back past the resume watermark.
    StoppedCaughtUp,
    /// The configured page bound was hit.
    StoppedPageBound,
    /// A page fetch failed; the result covers the pages before it.
    Halted,
    /// Credentials were missing, nothing was fetched.
    NotConfigured,
}

impl LoopState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoopState::Fetching => "Fetching",
            LoopState::StoppedExhausted => "StoppedExhausted",
            LoopState::StoppedCaughtUp => "StoppedCaughtUp",
            LoopState::StoppedPageBound => "StoppedPageBound",
            LoopState::Halted => "Halted",
            LoopState::NotConfigured => "NotConfigured",
        }
    }
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one connector run plus the counters behind it.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub result: SyncResult,
    pub state: LoopState,
    pub pages_fetched: usize,
    pub records_seen: usize,
    pub records_skipped: usize,
    pub records_covered: usize,
    /// Offset the loop would have requested next.
    pub final_offset: u64,
}

impl SyncOutcome {
    fn not_configured(cursor: Cursor) -> Self {
        SyncOutcome {
            result: SyncResult::empty(cursor),
            state: LoopState::NotConfigured,
            pages_fetched: 0,
            records_seen: 0,
            records_skipped: 0,
            records_covered: 0,
            final_offset: cursor.offset().unwrap_or(0),
        }
    }
}

/// Drives the paginated fetch loop for one partner.
pub struct SyncEngine {
    partner: Arc<dyn Partner>,
    fetcher: Arc<dyn PageFetcher>,
    settings: SyncSettings,
}

impl SyncEngine {
    pub fn new(partner: Arc<dyn Partner>, fetcher: Arc<dyn PageFetcher>) -> Self {
        let settings = SyncSettings::for_partner(partner.as_ref());
        Self {
            partner,
            fetcher,
            settings,
        }
    }

    pub fn with_settings(mut self, settings: SyncSettings) -> Self {
        self.settings = settings;
        self
    }

    pub async fn run(
        &self,
        credentials: &Credentials,
        cursor: Option<Cursor>,
    ) -> Result<SyncOutcome, SyncError> {
        self.run_at(credentials, cursor, Utc::now()).await
    }

    /// Same as [`SyncEngine::run`] with an explicit "now" for the first-run lookback.
    #[instrument(level = "info", skip_all, fields(partner = self.partner.id()))]
    pub async fn run_at(
        &self,
        credentials: &Credentials,
        cursor: Option<Cursor>,
        now: DateTime<Utc>,
    ) -> Result<SyncOutcome, SyncError> {
        self.settings.validate()?;
        let start = self.resolve_cursor(cursor, now)?;

        let Some(api_key) = self.partner.api_key(credentials) else {
            info!(
                key = self.partner.credential_key(),
                "Partner not configured; skipping."
            );
            return Ok(SyncOutcome::not_configured(start));
        };

        let page_size = self.settings.page_size;
        let mut tracker = CursorTracker::new(start, self.settings.rollback);
        let mut state = LoopState::Fetching;
        let mut transactions = Vec::new();
        let (mut seen, mut skipped, mut covered) = (0usize, 0usize, 0usize);

        info!(cursor = %start, page_size, "Starting sync.");

        while state == LoopState::Fetching {
            if let Some(max) = self.settings.max_pages
                && tracker.pages_done() >= max
            {
                warn!(max_pages = max, "Page bound reached; stopping early.");
                state = LoopState::StoppedPageBound;
                break;
            }

            let offset = tracker.offset();
            let request = self.partner.page_request(api_key, page_size, offset);
            let records = match self.fetcher.fetch_page(&request).await {
                Ok(records) => records,
                Err(e) => {
                    warn!(offset, error = %e, "Page fetch failed; returning partial results.");
                    state = LoopState::Halted;
                    break;
                }
            };

            let page = Page::new(records, offset, page_size);
            let mut caught_up = false;
            let mut emitted = 0usize;

            for raw in &page.records {
                seen += 1;
                let tx = match self.partner.normalize(raw) {
                    Ok(Some(tx)) => tx,
                    Ok(None) => {
                        skipped += 1;
                        continue;
                    }
                    Err(violation) => {
                        error!(
                            offset = page.offset,
                            error = %violation,
                            "Upstream schema changed; aborting run."
                        );
                        return Err(SyncError::SchemaViolation {
                            offset: page.offset,
                            source: violation,
                        });
                    }
                };

                match tracker.place(&tx) {
                    Placement::Emit => {
                        emitted += 1;
                        transactions.push(tx);
                    }
                    Placement::Covered { past_watermark } => {
                        debug!(order_id = %tx.order_id, "Already covered by watermark.");
                        covered += 1;
                        caught_up |= past_watermark;
                    }
                }
            }

            tracker.page_done(page_size);
            info!(
                page = tracker.pages_done(),
                offset = page.offset,
                records = page.len(),
                emitted,
                "Fetched page."
            );

            state = if page.reached_end() {
                LoopState::StoppedExhausted
            } else if caught_up {
                LoopState::StoppedCaughtUp
            } else {
                LoopState::Fetching
            };
        }

        // Page-bound and halted runs leave older pages unread.
        let reached_watermark = matches!(
            state,
            LoopState::StoppedExhausted | LoopState::StoppedCaughtUp
        );
        let next = tracker.next_cursor(reached_watermark);
        info!(
            state = %state,
            pages = tracker.pages_done(),
            transactions = transactions.len(),
            next_cursor = %next,
            "Sync finished."
        );

        Ok(SyncOutcome {
            result: SyncResult::new(next, transactions),
            state,
            pages_fetched: tracker.pages_done(),
            records_seen: seen,
            records_skipped: skipped,
            records_covered: covered,
            final_offset: tracker.offset(),
        })
    }

    fn resolve_cursor(
        &self,
        cursor: Option<Cursor>,
        now: DateTime<Utc>,
    ) -> Result<Cursor, SyncError> {
        let expected = self.partner.cursor_kind();
        match cursor {
            None => Ok(Cursor::initial(expected, now, self.settings.lookback)),
            Some(c) if c.kind() == expected => Ok(c),
            Some(c) => Err(SyncError::CursorMismatch {
                partner: self.partner.id().to_string(),
                expected,
                found: c.kind(),
            }),
        }
    }
}
