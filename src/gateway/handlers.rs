use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Json},
};
use subtle::ConstantTimeEq;

use super::AppState;
use crate::error::CycleError;

fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

fn bearer_token(headers: &HeaderMap) -> &str {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .unwrap_or("")
}

fn cycle_error_status(error: &CycleError) -> StatusCode {
    match error {
        CycleError::Busy => StatusCode::CONFLICT,
        CycleError::UniquenessExhausted { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        CycleError::Provider(_) => StatusCode::BAD_GATEWAY,
        CycleError::InsufficientCorpus { .. } => StatusCode::SERVICE_UNAVAILABLE,
        CycleError::Persistence(_) | CycleError::Corpus(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// GET /health: always public
pub(super) async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let body = serde_json::json!({
        "status": "ok",
        "busy": state.pipeline.is_busy(),
        "dry_run": state.pipeline.is_dry_run(),
    });
    Json(body)
}

/// POST /api/generate-lead: run one generation cycle
pub(super) async fn handle_generate_lead(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !constant_time_eq(bearer_token(&headers), &state.admin_secret) {
        tracing::warn!("generate-lead rejected: invalid or missing bearer token");
        let err = serde_json::json!({"success": false, "error": "Unauthorized"});
        return (StatusCode::UNAUTHORIZED, Json(err));
    }

    let accepted = match state.pipeline.run_cycle().await {
        Ok(result) => {
            let attempts = result.attempts.len();
            result.into_accepted().map(|accepted| (accepted, attempts))
        }
        Err(e) => Err(e),
    };

    match accepted {
        Ok(((record, record_id), attempts)) => {
            let body = serde_json::json!({
                "success": true,
                "record_id": record_id,
                "submission_id": record.submission_id,
                "name": record.identity.display_name(),
                "category": record.record.category,
                "comment_length": record.record.char_len(),
                "attempts": attempts,
            });
            (StatusCode::OK, Json(body))
        }
        Err(e) => {
            let status = cycle_error_status(&e);
            tracing::warn!(kind = e.kind(), status = status.as_u16(), error = %e, "generate-lead failed");
            let err = serde_json::json!({
                "success": false,
                "error": e.kind(),
                "message": e.to_string(),
            });
            (status, Json(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::corpus::{Category, HistoricalRecord, MemoryCorpus, RecordSink};
    use crate::error::{PersistenceError, ProviderError};
    use crate::generation::{ContentGenerator, GenerationPipeline};
    use crate::persona::{LengthTarget, StyleProfile};
    use async_trait::async_trait;
    use axum::body::to_bytes;
    use axum::http::HeaderValue;
    use chrono::Utc;
    use std::sync::Arc;

    const SECRET: &str = "admin-secret";

    struct Fixed(Result<&'static str, ()>);

    #[async_trait]
    impl ContentGenerator for Fixed {
        async fn generate(
            &self,
            _examples: &[HistoricalRecord],
            _style: &StyleProfile,
            _length: &LengthTarget,
        ) -> Result<String, ProviderError> {
            match self.0 {
                Ok(text) => Ok(text.to_string()),
                Err(()) => Err(ProviderError::Status {
                    provider: "anthropic".into(),
                    status: 529,
                    message: "overloaded".into(),
                }),
            }
        }
    }

    fn corpus(texts: &[&str]) -> Arc<MemoryCorpus> {
        let now = Utc::now();
        Arc::new(MemoryCorpus::new(
            texts
                .iter()
                .map(|t| HistoricalRecord::human(*t, Category::Local, now))
                .collect(),
        ))
    }

    fn default_corpus() -> Arc<MemoryCorpus> {
        corpus(&[
            "Traffic is terrible on Station Road today",
            "The bus was late again this morning",
            "Parking near the harbour is impossible in summer",
        ])
    }

    fn state(store: &Arc<MemoryCorpus>, generator: Fixed) -> AppState {
        let sink: Arc<dyn RecordSink> = store.clone();
        let pipeline = GenerationPipeline::new(
            GenerationConfig::default(),
            store.clone(),
            Some(sink),
            Arc::new(generator),
        )
        .unwrap()
        .with_seed(5);
        AppState::new(Arc::new(pipeline), SECRET)
    }

    fn authorized() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {SECRET}")).unwrap(),
        );
        headers
    }

    async fn call(state: AppState, headers: HeaderMap) -> (StatusCode, serde_json::Value) {
        let response = handle_generate_lead(State(state), headers)
            .await
            .into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn bearer_token_requires_scheme_prefix() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), "");

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(SECRET));
        assert_eq!(bearer_token(&headers), "");

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc"),
        );
        assert_eq!(bearer_token(&headers), "abc");
    }

    #[test]
    fn error_statuses_are_distinct_per_failure() {
        assert_eq!(cycle_error_status(&CycleError::Busy), StatusCode::CONFLICT);
        assert_eq!(
            cycle_error_status(&CycleError::UniquenessExhausted {
                attempts: 5,
                last_similarity: 80.0
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            cycle_error_status(&CycleError::InsufficientCorpus {
                found: 0,
                required: 3
            }),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            cycle_error_status(&CycleError::Persistence(PersistenceError::Commit(
                "locked".into()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized_and_runs_nothing() {
        let store = default_corpus();
        let (status, body) = call(state(&store, Fixed(Ok("Fresh words"))), HeaderMap::new()).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert!(store.committed().is_empty());
    }

    #[tokio::test]
    async fn wrong_token_is_unauthorized() {
        let store = default_corpus();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer admin-secreT"),
        );

        let (status, _) = call(state(&store, Fixed(Ok("Fresh words"))), headers).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn accepted_cycle_returns_record_summary() {
        let store = default_corpus();
        let text = "The standstill by the high street is unbearable";

        let (status, body) = call(state(&store, Fixed(Ok(text))), authorized()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["attempts"], 1);
        assert_eq!(body["comment_length"], text.chars().count());
        assert!(body["record_id"].is_i64());
        assert_eq!(store.committed().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_output_is_unprocessable() {
        let store = default_corpus();

        let (status, body) = call(
            state(&store, Fixed(Ok("Traffic is terrible on Station Road today"))),
            authorized(),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "uniqueness_exhausted");
        assert!(store.committed().is_empty());
    }

    #[tokio::test]
    async fn provider_failure_is_bad_gateway() {
        let store = default_corpus();
        let (status, body) = call(state(&store, Fixed(Err(()))), authorized()).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "provider_error");
    }

    #[tokio::test]
    async fn empty_corpus_is_service_unavailable() {
        let store = corpus(&["Only one record"]);
        let (status, body) = call(state(&store, Fixed(Ok("Fresh words"))), authorized()).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "insufficient_corpus");
    }
}
