//! Corpus store: historical records read for sampling and comparison, and
//! the sink accepted candidates are committed to.

pub mod memory;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use memory::MemoryCorpus;
pub use sqlite::{ImportRow, SqliteCorpus};
pub use traits::{CorpusReader, RecordSink};
pub use types::{
    Category, CategoryDistribution, HistoricalRecord, RecordId, SourceKind, SynthesizedRecord,
    SyntheticIdentity, category_distribution,
};
