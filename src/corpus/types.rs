use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Submitter category. Closed set: unknown values from stored data map to
/// [`Category::Other`] instead of becoming new categories.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
)]
pub enum Category {
    #[default]
    Local,
    Visitor,
    Tourist,
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [Self::Local, Self::Visitor, Self::Tourist, Self::Other];

    pub fn as_db(self) -> &'static str {
        match self {
            Self::Local => "Local",
            Self::Visitor => "Visitor",
            Self::Tourist => "Tourist",
            Self::Other => "Other",
        }
    }

    /// Missing or blank values take the historical default; anything
    /// unrecognised is folded into `Other`.
    pub fn from_db(raw: Option<&str>) -> Self {
        let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
            return Self::default();
        };
        match value.to_ascii_lowercase().as_str() {
            "local" => Self::Local,
            "visitor" => Self::Visitor,
            "tourist" => Self::Tourist,
            "other" => Self::Other,
            _ => {
                tracing::warn!(category = value, "unknown category in corpus, treating as Other");
                Self::Other
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Human,
    Synthetic,
}

impl SourceKind {
    pub fn as_db(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Synthetic => "synthetic",
        }
    }

    pub fn from_db(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("synthetic") => Self::Synthetic,
            _ => Self::Human,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub category: Category,
    pub source_kind: SourceKind,
}

impl HistoricalRecord {
    pub fn human(text: impl Into<String>, category: Category, created_at: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            created_at,
            category,
            source_kind: SourceKind::Human,
        }
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticIdentity {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl SyntheticIdentity {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// An accepted candidate ready to be committed to the corpus store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedRecord {
    pub submission_id: String,
    pub identity: SyntheticIdentity,
    pub record: HistoricalRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub type CategoryDistribution = BTreeMap<Category, u64>;

/// Count records per category, skipping records without text.
pub fn category_distribution<'a>(
    records: impl IntoIterator<Item = &'a HistoricalRecord>,
) -> CategoryDistribution {
    let mut distribution = CategoryDistribution::new();
    for record in records.into_iter().filter(|r| r.has_text()) {
        *distribution.entry(record.category).or_insert(0) += 1;
    }
    distribution
}
