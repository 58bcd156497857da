use super::traits::{CorpusReader, RecordSink};
use super::types::{HistoricalRecord, RecordId, SynthesizedRecord};
use crate::error::PersistenceError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// In-process corpus used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryCorpus {
    records: Mutex<Vec<HistoricalRecord>>,
    committed: Mutex<Vec<SynthesizedRecord>>,
    fail_commits: AtomicBool,
}

impl MemoryCorpus {
    pub fn new(records: Vec<HistoricalRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    /// Make every subsequent `commit` fail, for exercising persistence errors.
    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    pub fn committed(&self) -> Vec<SynthesizedRecord> {
        self.committed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CorpusReader for MemoryCorpus {
    async fn fetch_recent(&self, limit: usize) -> Result<Vec<HistoricalRecord>, PersistenceError> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        let mut recent: Vec<_> = records
            .iter()
            .filter(|record| record.has_text())
            .cloned()
            .collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(limit);
        Ok(recent)
    }
}

#[async_trait]
impl RecordSink for MemoryCorpus {
    async fn commit(&self, record: &SynthesizedRecord) -> Result<RecordId, PersistenceError> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(PersistenceError::Commit("memory corpus rejected commit".into()));
        }

        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        records.push(record.record.clone());
        let id = i64::try_from(records.len()).unwrap_or(i64::MAX);
        drop(records);

        self.committed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(RecordId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::types::{Category, SourceKind, SyntheticIdentity};
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn fetch_recent_orders_newest_first_and_limits() {
        let now = Utc::now();
        let corpus = MemoryCorpus::new(vec![
            HistoricalRecord::human("oldest", Category::Local, now - Duration::hours(3)),
            HistoricalRecord::human("newest", Category::Local, now),
            HistoricalRecord::human("middle", Category::Local, now - Duration::hours(1)),
        ]);

        let recent = corpus.fetch_recent(2).await.unwrap();

        let texts: Vec<_> = recent.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["newest", "middle"]);
    }

    #[tokio::test]
    async fn fetch_recent_ignores_blank_records() {
        let now = Utc::now();
        let corpus = MemoryCorpus::new(vec![
            HistoricalRecord::human("older", Category::Local, now - Duration::hours(2)),
            HistoricalRecord::human("", Category::Local, now),
            HistoricalRecord::human("  ", Category::Local, now - Duration::hours(1)),
        ]);

        let recent = corpus.fetch_recent(2).await.unwrap();

        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].text, "older");
    }

    #[tokio::test]
    async fn commit_appends_to_corpus() {
        let corpus = MemoryCorpus::default();
        let record = SynthesizedRecord {
            submission_id: "synthetic_test".into(),
            identity: SyntheticIdentity {
                first_name: "Ada".into(),
                last_name: "King".into(),
                email: "ada.king@gmail.com".into(),
            },
            record: HistoricalRecord {
                text: "Cars idling along the seafront".into(),
                created_at: Utc::now(),
                category: Category::Visitor,
                source_kind: SourceKind::Synthetic,
            },
        };

        let id = corpus.commit(&record).await.unwrap();

        assert_eq!(id, RecordId(1));
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.committed(), vec![record]);
    }

    #[tokio::test]
    async fn failing_commit_reports_persistence_error() {
        let corpus = MemoryCorpus::default();
        corpus.fail_commits(true);
        let record = SynthesizedRecord {
            submission_id: "synthetic_fail".into(),
            identity: SyntheticIdentity {
                first_name: "Leo".into(),
                last_name: "Hall".into(),
                email: "leo@outlook.com".into(),
            },
            record: HistoricalRecord::human("text", Category::Local, Utc::now()),
        };

        let err = corpus.commit(&record).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Commit(_)));
        assert!(corpus.is_empty());
    }
}
