#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use synthlead::config::GenerationConfig;
use synthlead::corpus::{Category, HistoricalRecord, MemoryCorpus, RecordSink};
use synthlead::error::ProviderError;
use synthlead::generation::{ContentGenerator, GenerationPipeline};
use synthlead::persona::{LengthTarget, StyleProfile};

pub const TRAFFIC: &str = "Traffic is terrible on Station Road";
pub const GRIDLOCK: &str = "The gridlock near the school is awful";
pub const PARKING: &str = "Parking has become impossible downtown";
pub const FRESH: &str = "The standstill by the high street is unbearable";

/// Replays queued replies in order, then repeats `fallback`.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, ProviderError>>>,
    fallback: String,
    calls: Mutex<usize>,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<Result<String, ProviderError>>, fallback: &str) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            fallback: fallback.to_string(),
            calls: Mutex::new(0),
        })
    }

    pub fn always(text: &str) -> Arc<Self> {
        Self::new(Vec::new(), text)
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl ContentGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        _examples: &[HistoricalRecord],
        _style: &StyleProfile,
        _length: &LengthTarget,
    ) -> Result<String, ProviderError> {
        *self.calls.lock().unwrap() += 1;
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}

/// Always fails the way an unreachable endpoint does.
pub struct DownGenerator {
    calls: Mutex<usize>,
}

impl DownGenerator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl ContentGenerator for DownGenerator {
    async fn generate(
        &self,
        _examples: &[HistoricalRecord],
        _style: &StyleProfile,
        _length: &LengthTarget,
    ) -> Result<String, ProviderError> {
        *self.calls.lock().unwrap() += 1;
        Err(ProviderError::Transport {
            provider: "anthropic".into(),
            message: "connection refused".into(),
        })
    }
}

/// The three-record corpus used by the end-to-end scenarios, newest first.
pub fn scenario_corpus() -> Arc<MemoryCorpus> {
    let now = Utc::now();
    Arc::new(MemoryCorpus::new(vec![
        HistoricalRecord::human(TRAFFIC, Category::Local, now),
        HistoricalRecord::human(GRIDLOCK, Category::Local, now - Duration::minutes(5)),
        HistoricalRecord::human(PARKING, Category::Visitor, now - Duration::minutes(10)),
    ]))
}

pub fn pipeline(
    store: &Arc<MemoryCorpus>,
    generator: Arc<dyn ContentGenerator>,
    config: GenerationConfig,
) -> GenerationPipeline {
    let sink: Arc<dyn RecordSink> = store.clone();
    GenerationPipeline::new(config, store.clone(), Some(sink), generator)
        .unwrap()
        .with_seed(2024)
}
