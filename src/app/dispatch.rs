use crate::cli::commands::{Cli, Commands, CorpusCommands};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::Config;
use crate::config::GatewayConfig;
use crate::corpus::{Category, CorpusReader, RecordSink, SqliteCorpus};
use crate::generation::{CycleOutcome, GenerationCycleResult, GenerationPipeline, ProviderGenerator};
use crate::providers::{self, Provider};
use crate::scheduler::{Scheduler, SystemClock};
use crate::similarity;

/// Wire provider, store and pipeline together from config.
///
/// A missing API key fails here, before anything is scheduled or served.
async fn build_pipeline(config: &Config, dry_run: bool) -> Result<Arc<GenerationPipeline>> {
    config.require_api_key()?;

    let provider: Arc<dyn Provider> = Arc::from(providers::create_provider(&config.provider)?);
    let generator = Arc::new(ProviderGenerator::new(
        provider,
        config.provider.model.clone(),
        config.generation.max_chars,
    ));

    let store = Arc::new(SqliteCorpus::open(&config.database_path()).await?);
    let reader: Arc<dyn CorpusReader> = store.clone();
    let sink: Option<Arc<dyn RecordSink>> = if dry_run { None } else { Some(store) };

    let pipeline =
        GenerationPipeline::new(config.generation.clone(), reader, sink, generator)
            .context("Invalid [generation] configuration")?;
    Ok(Arc::new(pipeline))
}

fn print_cycle(result: &GenerationCycleResult) {
    for attempt in &result.attempts {
        println!(
            "  #{} {:>5.1}%  {} [{} / {}]",
            attempt.attempt_number,
            attempt.similarity_score,
            if attempt.accepted { "accepted" } else { "rejected" },
            attempt.style,
            attempt.length_bucket,
        );
    }

    match &result.outcome {
        CycleOutcome::Accepted { record, record_id } => {
            println!();
            println!(
                "{} <{}> ({})",
                record.identity.display_name(),
                record.identity.email,
                record.record.category
            );
            println!("{}", record.record.text);
            match record_id {
                Some(id) => println!("committed as record {id}"),
                None => println!("dry run: not committed"),
            }
        }
        CycleOutcome::Exhausted => {
            println!();
            println!(
                "no unique candidate after {} attempts (last similarity {:.1}%)",
                result.attempts.len(),
                result.last_similarity()
            );
        }
    }
}

async fn run_scheduler(config: &Config, dry_run: bool) -> Result<()> {
    let pipeline = build_pipeline(config, dry_run).await?;
    let scheduler = Scheduler::new(config.scheduler.clone(), pipeline, Arc::new(SystemClock))
        .context("Invalid [scheduler] configuration")?;

    let cancel = CancellationToken::new();
    let signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
        }
        signal.cancel();
    });

    info!(
        active_start = config.scheduler.active_start_hour,
        active_end = config.scheduler.active_end_hour,
        dry_run,
        "scheduler started"
    );
    let state = scheduler.run(cancel).await;
    info!(
        cycles = state.cycles,
        accepted = state.accepted,
        exhausted = state.exhausted,
        failed = state.failed,
        "scheduler stopped"
    );
    Ok(())
}

async fn run_corpus(config: &Config, command: CorpusCommands) -> Result<()> {
    let store = SqliteCorpus::open(&config.database_path()).await?;
    match command {
        CorpusCommands::Import { file } => {
            let imported = store.load_import_file(&file).await?;
            println!(
                "Imported {imported} new records into {}",
                config.database_path().display()
            );
        }
        CorpusCommands::Stats => {
            let total = store.count().await?;
            let counts = store.category_counts().await?;
            println!("{total} records in {}", config.database_path().display());
            for category in Category::ALL {
                println!(
                    "  {:<8} {}",
                    category.to_string(),
                    counts.get(&category).copied().unwrap_or(0)
                );
            }
        }
    }
    Ok(())
}

pub async fn dispatch(cli: Cli, config: Arc<Config>) -> Result<()> {
    match cli.command {
        Commands::Run { dry_run } => run_scheduler(&config, dry_run).await,

        Commands::Generate { dry_run } => {
            let pipeline = build_pipeline(&config, dry_run).await?;
            let result = pipeline.run_cycle().await?;
            print_cycle(&result);
            Ok(())
        }

        Commands::Gateway { port, host } => {
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            let port = port.unwrap_or(config.gateway.port);
            config.gateway.require_admin_secret()?;
            let pipeline = build_pipeline(&config, false).await?;
            let gateway = GatewayConfig {
                request_timeout_secs: config.gateway_request_timeout_secs(),
                ..config.gateway.clone()
            };
            crate::gateway::run_gateway(&host, port, &gateway, pipeline).await
        }

        Commands::Similarity { a, b, n } => {
            anyhow::ensure!(n > 0, "n-gram size must be at least 1");
            println!("{:.2}", similarity::similarity(&a, &b, n));
            Ok(())
        }

        Commands::Corpus { corpus_command } => run_corpus(&config, corpus_command).await,
    }
}
