use crate::corpus::{RecordId, SynthesizedRecord};
use crate::error::CycleError;
use serde::Serialize;

/// Diagnostics for one generate-and-score pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationAttempt {
    pub attempt_number: usize,
    pub candidate_text: String,
    /// Highest score against the comparison window, `[0, 100]`.
    pub similarity_score: f64,
    pub accepted: bool,
    pub closest_match: Option<String>,
    pub style: String,
    pub length_bucket: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CycleOutcome {
    Accepted {
        record: SynthesizedRecord,
        /// `None` for dry runs.
        record_id: Option<RecordId>,
    },
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationCycleResult {
    pub outcome: CycleOutcome,
    pub attempts: Vec<GenerationAttempt>,
}

impl GenerationCycleResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self.outcome, CycleOutcome::Accepted { .. })
    }

    pub fn last_similarity(&self) -> f64 {
        self.attempts.last().map_or(0.0, |a| a.similarity_score)
    }

    /// The accepted record, or `UniquenessExhausted` carrying the attempt count.
    pub fn into_accepted(self) -> Result<(SynthesizedRecord, Option<RecordId>), CycleError> {
        let last_similarity = self.last_similarity();
        match self.outcome {
            CycleOutcome::Accepted { record, record_id } => Ok((record, record_id)),
            CycleOutcome::Exhausted => Err(CycleError::UniquenessExhausted {
                attempts: self.attempts.len(),
                last_similarity,
            }),
        }
    }
}
