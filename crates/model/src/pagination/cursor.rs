use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Which resumption shape a partner persists between runs.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorKind {
    Offset,
    Watermark,
}

impl Display for CursorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CursorKind::Offset => write!(f, "offset"),
            CursorKind::Watermark => write!(f, "watermark"),
        }
    }
}

/// Represents the resumption cursor handed in and out of a sync run.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    /// Page offset into a list endpoint without time ordering guarantees.
    Offset { offset: u64 },

    /// Unix epoch seconds of the newest finalized transaction seen.
    Watermark { timestamp: i64 },
}

impl Cursor {
    pub fn kind(&self) -> CursorKind {
        match self {
            Cursor::Offset { .. } => CursorKind::Offset,
            Cursor::Watermark { .. } => CursorKind::Watermark,
        }
    }

    /// Cursor used when nothing has been persisted yet. Watermarks start
    /// `lookback` before `now` so a first sync is bounded.
    pub fn initial(kind: CursorKind, now: DateTime<Utc>, lookback: Duration) -> Self {
        match kind {
            CursorKind::Offset => Cursor::Offset { offset: 0 },
            CursorKind::Watermark => Cursor::Watermark {
                timestamp: (now - lookback).timestamp(),
            },
        }
    }

    /// Steps an offset cursor back by `margin`, clamped at zero.
    /// Watermark cursors are returned as is.
    pub fn rolled_back(self, margin: u64) -> Self {
        match self {
            Cursor::Offset { offset } => Cursor::Offset {
                offset: offset.saturating_sub(margin),
            },
            other => other,
        }
    }

    pub fn offset(&self) -> Option<u64> {
        match self {
            Cursor::Offset { offset } => Some(*offset),
            _ => None,
        }
    }

    pub fn watermark(&self) -> Option<i64> {
        match self {
            Cursor::Watermark { timestamp } => Some(*timestamp),
            _ => None,
        }
    }
}

impl Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cursor::Offset { offset } => write!(f, "offset={offset}"),
            Cursor::Watermark { timestamp } => write!(f, "watermark={timestamp}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_rollback_clamps_at_zero() {
        let c = Cursor::Offset { offset: 300 };
        assert_eq!(c.rolled_back(500), Cursor::Offset { offset: 0 });

        let c = Cursor::Offset { offset: 1200 };
        assert_eq!(c.rolled_back(500), Cursor::Offset { offset: 700 });
    }

    #[test]
    fn watermark_ignores_rollback() {
        let c = Cursor::Watermark { timestamp: 42 };
        assert_eq!(c.rolled_back(500), c);
    }

    #[test]
    fn initial_watermark_looks_back() {
        let now = DateTime::from_timestamp(1_000_000, 0).unwrap();
        let c = Cursor::initial(CursorKind::Watermark, now, Duration::days(5));
        assert_eq!(c.watermark(), Some(1_000_000 - 5 * 24 * 60 * 60));
        assert_eq!(
            Cursor::initial(CursorKind::Offset, now, Duration::days(5)),
            Cursor::Offset { offset: 0 }
        );
    }
}
