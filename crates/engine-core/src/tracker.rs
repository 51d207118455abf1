//! Cursor bookkeeping for a single run.

use model::{pagination::cursor::Cursor, records::transaction::CanonicalTransaction};

/// What to do with a mapped transaction relative to the resume cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// New to this cursor; emit it.
    Emit,
    /// At or behind the resume watermark, already covered by an earlier run.
    /// `past_watermark` is set when it is strictly older, which means the
    /// listing has caught up.
    Covered { past_watermark: bool },
}

#[derive(Debug, Clone)]
pub struct CursorTracker {
    start: Cursor,
    rollback: u64,
    offset: u64,
    pages_done: usize,
    newest: Option<i64>,
}

impl CursorTracker {
    pub fn new(start: Cursor, rollback: u64) -> Self {
        Self {
            start,
            rollback,
            offset: start.offset().unwrap_or(0),
            pages_done: 0,
            newest: None,
        }
    }

    /// Offset of the next page to request.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn place(&mut self, tx: &CanonicalTransaction) -> Placement {
        match self.start {
            Cursor::Offset { .. } => Placement::Emit,
            Cursor::Watermark { timestamp } => {
                if tx.epoch_seconds() <= timestamp {
                    Placement::Covered {
                        past_watermark: tx.timestamp < timestamp as f64,
                    }
                } else {
                    self.newest = Some(self.newest.map_or(tx.epoch_seconds(), |n| {
                        n.max(tx.epoch_seconds())
                    }));
                    Placement::Emit
                }
            }
        }
    }

    /// Advances past a successfully fetched page, whatever its length.
    pub fn page_done(&mut self, page_size: usize) {
        self.offset += page_size as u64;
        self.pages_done += 1;
    }

    pub fn pages_done(&self) -> usize {
        self.pages_done
    }

    /// Cursor to hand back to the caller. An offset cursor that moved is rolled
    /// back so the next run re-scans a trailing window. A watermark moves to the
    /// newest emitted transaction only when `reached_watermark` is set, i.e. the
    /// listing was walked down to the old watermark or to its end. Otherwise the
    /// unfetched pages may still hold newer transactions, so it stays put.
    pub fn next_cursor(&self, reached_watermark: bool) -> Cursor {
        match self.start {
            Cursor::Offset { .. } if self.pages_done == 0 => self.start,
            Cursor::Offset { .. } => Cursor::Offset {
                offset: self.offset,
            }
            .rolled_back(self.rollback),
            Cursor::Watermark { .. } if !reached_watermark => self.start,
            Cursor::Watermark { timestamp } => Cursor::Watermark {
                timestamp: self.newest.unwrap_or(timestamp),
            },
        }
    }
}
