//! Candidate generation: prompt construction, provider adapter, the
//! uniqueness gate and the end-to-end cycle.

pub mod cycle;
pub mod gate;
pub mod generator;
pub mod postprocess;
pub mod prompt;
pub mod records;
pub mod types;

pub use cycle::GenerationPipeline;
pub use gate::{GateOutcome, GateSettings, GateState, UniquenessGate};
pub use generator::{ContentGenerator, ProviderGenerator};
pub use records::RecordFactory;
pub use types::{CycleOutcome, GenerationAttempt, GenerationCycleResult};
