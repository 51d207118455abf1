use crate::error::SyncError;
use chrono::Duration;
use connectors::partner::Partner;

pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Tunables for one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// Records requested per page; a shorter page ends the run.
    pub page_size: usize,
    /// Subtracted from an offset cursor at the end of a run.
    pub rollback: u64,
    /// Reach of a first watermark sync.
    pub lookback: Duration,
    /// Upper bound on pages per run. `None` relies on the upstream running out.
    pub max_pages: Option<usize>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            rollback: 0,
            lookback: Duration::days(5),
            max_pages: None,
        }
    }
}

impl SyncSettings {
    pub fn for_partner(partner: &dyn Partner) -> Self {
        let defaults = partner.defaults();
        Self {
            rollback: defaults.rollback,
            lookback: defaults.lookback,
            ..Self::default()
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_rollback(mut self, rollback: u64) -> Self {
        self.rollback = rollback;
        self
    }

    pub fn with_lookback(mut self, lookback: Duration) -> Self {
        self.lookback = lookback;
        self
    }

    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn validate(&self) -> Result<(), SyncError> {
        if self.page_size == 0 {
            return Err(SyncError::InvalidSettings(
                "page_size must be greater than zero".into(),
            ));
        }
        if self.lookback < Duration::zero() {
            return Err(SyncError::InvalidSettings(
                "lookback must not be negative".into(),
            ));
        }
        if self.max_pages == Some(0) {
            return Err(SyncError::InvalidSettings(
                "max_pages must be greater than zero when set".into(),
            ));
        }
        Ok(())
    }
}
