use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite file; defaults to `<workspace>/synthlead.db`.
    #[serde(default)]
    pub path: Option<String>,
}
