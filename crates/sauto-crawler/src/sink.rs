//! Emission boundary for terminal records.
//!
//! The crawler hands every finished record to a [`RecordSink`]; what the
//! sink does with it (serialize, store, forward) is outside the crawl
//! core's concern.

use crate::error::CrawlerError;
use crate::types::ListingRecord;

/// Receives each terminal record exactly once.
pub trait RecordSink: Send {
    /// # Errors
    ///
    /// An error here is output I/O failing, and it aborts the crawl — it is
    /// the one failure the orchestrator does not swallow.
    fn emit(&mut self, record: ListingRecord) -> Result<(), CrawlerError>;
}

/// In-memory sink, mainly for tests and ad-hoc collection.
#[derive(Debug, Default)]
pub struct VecSink {
    pub records: Vec<ListingRecord>,
}

impl RecordSink for VecSink {
    fn emit(&mut self, record: ListingRecord) -> Result<(), CrawlerError> {
        self.records.push(record);
        Ok(())
    }
}
