use super::traits::{CorpusReader, RecordSink};
use super::types::{
    Category, CategoryDistribution, HistoricalRecord, RecordId, SourceKind, SynthesizedRecord,
};
use crate::error::PersistenceError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use std::path::Path;
use uuid::Uuid;

/// SQLite-backed corpus: both the reader and the sink of the pipeline.
#[derive(Debug, Clone)]
pub struct SqliteCorpus {
    pool: SqlitePool,
}

/// One row of a JSON import file (an array of these).
#[derive(Debug, Clone, Deserialize)]
pub struct ImportRow {
    #[serde(default)]
    pub submission_id: Option<String>,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub visitor_type: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

fn to_db_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, PersistenceError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PersistenceError::Query(format!("invalid timestamp '{raw}': {e}")))
}

impl SqliteCorpus {
    pub async fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create store directory: {}", parent.display())
            })?;
        }

        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .with_context(|| format!("Failed to open corpus DB: {}", db_path.display()))?;

        ensure_schema(&pool).await?;
        Ok(Self { pool })
    }

    /// Bulk-load records from a JSON array. Rows without a comment are still
    /// stored; they simply never enter the comparison window.
    pub async fn import_records(&self, rows: &[ImportRow]) -> Result<usize> {
        let mut tx = self.pool.begin().await.context("Failed to begin import")?;
        let mut imported = 0usize;

        for row in rows {
            let created_at = match row.timestamp.as_deref().map(DateTime::parse_from_rfc3339) {
                Some(Ok(parsed)) => parsed.with_timezone(&Utc),
                Some(Err(error)) => {
                    tracing::warn!(
                        first_name = %row.first_name,
                        %error,
                        "invalid import timestamp, using current time"
                    );
                    Utc::now()
                }
                None => Utc::now(),
            };
            let submission_id = row
                .submission_id
                .clone()
                .unwrap_or_else(|| format!("import_{}", Uuid::new_v4()));

            let result = sqlx::query(
                "INSERT OR IGNORE INTO records (
                    submission_id, first_name, last_name, email, category, comment, source, created_at
                 ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&submission_id)
            .bind(&row.first_name)
            .bind(row.last_name.as_deref())
            .bind(&row.email)
            .bind(Category::from_db(row.visitor_type.as_deref()).as_db())
            .bind(row.comments.as_deref())
            .bind(SourceKind::from_db(row.source.as_deref()).as_db())
            .bind(to_db_timestamp(&created_at))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to import record {submission_id}"))?;

            if result.rows_affected() > 0 {
                imported += 1;
            }
        }

        tx.commit().await.context("Failed to commit import")?;
        Ok(imported)
    }

    pub async fn load_import_file(&self, path: &Path) -> Result<usize> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read import file: {}", path.display()))?;
        let rows: Vec<ImportRow> =
            serde_json::from_str(&contents).context("Import file must be a JSON array of records")?;
        self.import_records(&rows).await
    }

    /// Per-category counts over records that carry text.
    pub async fn category_counts(&self) -> Result<CategoryDistribution, PersistenceError> {
        let rows = sqlx::query(
            "SELECT category, COUNT(*) AS total
             FROM records
             WHERE comment IS NOT NULL AND TRIM(comment) <> ''
             GROUP BY category",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut distribution = CategoryDistribution::new();
        for row in rows {
            let category: Option<String> = row.get("category");
            let total: i64 = row.get("total");
            *distribution
                .entry(Category::from_db(category.as_deref()))
                .or_insert(0) += u64::try_from(total).unwrap_or(0);
        }
        Ok(distribution)
    }

    pub async fn count(&self) -> Result<u64, PersistenceError> {
        let row = sqlx::query("SELECT COUNT(*) FROM records")
            .fetch_one(&self.pool)
            .await?;
        let total: i64 = row.get(0);
        Ok(u64::try_from(total).unwrap_or(0))
    }
}

#[async_trait]
impl CorpusReader for SqliteCorpus {
    async fn fetch_recent(&self, limit: usize) -> Result<Vec<HistoricalRecord>, PersistenceError> {
        let rows = sqlx::query(
            "SELECT comment, category, source, created_at
             FROM records
             WHERE comment IS NOT NULL AND TRIM(comment) <> ''
             ORDER BY created_at DESC, id DESC
             LIMIT ?",
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let comment: Option<String> = row.get("comment");
            let category: Option<String> = row.get("category");
            let source: Option<String> = row.get("source");
            let created_at_raw: String = row.get("created_at");
            records.push(HistoricalRecord {
                text: comment.unwrap_or_default(),
                created_at: parse_timestamp(&created_at_raw)?,
                category: Category::from_db(category.as_deref()),
                source_kind: SourceKind::from_db(source.as_deref()),
            });
        }
        Ok(records)
    }
}

#[async_trait]
impl RecordSink for SqliteCorpus {
    async fn commit(&self, record: &SynthesizedRecord) -> Result<RecordId, PersistenceError> {
        let result = sqlx::query(
            "INSERT INTO records (
                submission_id, first_name, last_name, email, category, comment, source, created_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.submission_id)
        .bind(&record.identity.first_name)
        .bind(&record.identity.last_name)
        .bind(&record.identity.email)
        .bind(record.record.category.as_db())
        .bind(&record.record.text)
        .bind(record.record.source_kind.as_db())
        .bind(to_db_timestamp(&record.record.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| PersistenceError::Commit(e.to_string()))?;

        Ok(RecordId(result.last_insert_rowid()))
    }
}

async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS records (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            submission_id TEXT NOT NULL UNIQUE,
            first_name    TEXT NOT NULL,
            last_name     TEXT,
            email         TEXT NOT NULL,
            category      TEXT,
            comment       TEXT,
            source        TEXT NOT NULL DEFAULT 'human',
            created_at    TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create records table")?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_records_created_at ON records(created_at)")
        .execute(pool)
        .await
        .context("Failed to create records index")?;

    Ok(())
}
