use thiserror::Error;

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Provider errors ────────────────────────────────────────────────────────

/// Failure of the text generation provider. Never treated as a similarity
/// rejection; the scheduler retries these with exponential backoff.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider {provider} transport failed: {message}")]
    Transport { provider: String, message: String },

    #[error("provider {provider} authentication failed")]
    Auth { provider: String },

    #[error("provider {provider} returned status {status}: {message}")]
    Status {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("provider {provider} returned a malformed response: {message}")]
    MalformedResponse { provider: String, message: String },

    #[error("unknown provider: {0}")]
    Unknown(String),
}

// ─── Persistence errors ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("commit failed: {0}")]
    Commit(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for PersistenceError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::Unavailable(error.to_string())
            }
            other => Self::Query(other.to_string()),
        }
    }
}

// ─── Cycle errors ───────────────────────────────────────────────────────────

/// Terminal failure of one generation cycle. None of these crash the process.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("insufficient corpus: {found} usable records, need at least {required}")]
    InsufficientCorpus { found: usize, required: usize },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("no unique candidate after {attempts} attempts (last similarity {last_similarity:.1}%)")]
    UniquenessExhausted { attempts: usize, last_similarity: f64 },

    #[error("persistence: {0}")]
    Persistence(#[source] PersistenceError),

    #[error("corpus read failed: {0}")]
    Corpus(#[source] PersistenceError),

    #[error("a generation cycle is already in flight")]
    Busy,
}

impl CycleError {
    /// Stable short label used in logs and HTTP payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InsufficientCorpus { .. } => "insufficient_corpus",
            Self::Provider(_) => "provider_error",
            Self::UniquenessExhausted { .. } => "uniqueness_exhausted",
            Self::Persistence(_) => "persistence_error",
            Self::Corpus(_) => "corpus_error",
            Self::Busy => "busy",
        }
    }

    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider(_))
    }
}
