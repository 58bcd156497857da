//! Axum HTTP gateway exposing the manual generation trigger.
//!
//! - `POST /api/generate-lead` runs one cycle (bearer token required)
//! - `GET /health` is public
//!
//! Bodies are capped at [`MAX_BODY_SIZE`]; the request timeout comes from
//! `[gateway] request_timeout_secs`, widened at startup to cover a full cycle.

mod handlers;

use handlers::{handle_generate_lead, handle_health};

use crate::config::GatewayConfig;
use crate::generation::GenerationPipeline;
use anyhow::{Context, Result};
use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Maximum request body size (64KB). The trigger takes no body.
pub const MAX_BODY_SIZE: usize = 65_536;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<GenerationPipeline>,
    pub admin_secret: Arc<str>,
}

impl AppState {
    pub fn new(pipeline: Arc<GenerationPipeline>, admin_secret: &str) -> Self {
        Self {
            pipeline,
            admin_secret: Arc::from(admin_secret),
        }
    }
}

pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/api/generate-lead", post(handle_generate_lead))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
}

/// Bind `host:port` and serve until the process is stopped.
pub async fn run_gateway(
    host: &str,
    port: u16,
    config: &GatewayConfig,
    pipeline: Arc<GenerationPipeline>,
) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid gateway address {host}:{port}"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind gateway on {addr}"))?;

    run_gateway_with_listener(host, listener, config, pipeline).await
}

/// Serve from a pre-bound listener. A missing admin secret is fatal.
pub async fn run_gateway_with_listener(
    host: &str,
    listener: tokio::net::TcpListener,
    config: &GatewayConfig,
    pipeline: Arc<GenerationPipeline>,
) -> Result<()> {
    let admin_secret = config.require_admin_secret()?;
    let actual_port = listener.local_addr()?.port();

    tracing::info!(
        addr = %format!("{host}:{actual_port}"),
        dry_run = pipeline.is_dry_run(),
        timeout_secs = config.request_timeout_secs,
        "gateway listening"
    );

    let app = router(
        AppState::new(pipeline, admin_secret),
        Duration::from_secs(config.request_timeout_secs),
    );

    axum::serve(listener, app).await?;

    Ok(())
}
