use super::types::{HistoricalRecord, RecordId, SynthesizedRecord};
use crate::error::PersistenceError;
use async_trait::async_trait;

/// Read side of the corpus store.
#[async_trait]
pub trait CorpusReader: Send + Sync {
    /// Up to `limit` records that carry text, most recent first. Blank
    /// records never take a slot in the window.
    async fn fetch_recent(&self, limit: usize) -> Result<Vec<HistoricalRecord>, PersistenceError>;
}

/// Write side of the corpus store.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn commit(&self, record: &SynthesizedRecord) -> Result<RecordId, PersistenceError>;
}
