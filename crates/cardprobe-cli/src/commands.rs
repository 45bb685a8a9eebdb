//! Sub-command handlers. Results go to stdout as pretty JSON; logs go to
//! stderr. Unresolved identifiers are ordinary output, not errors.

use std::time::Duration;

use anyhow::Context;
use cardprobe_core::{AppConfig, BatchPolicy, ProductId};
use cardprobe_scraper::{build_default_chain, synthesize, BatchOrchestrator, CandidateAddress};
use serde::Serialize;

pub(crate) async fn run_resolve(config: &AppConfig, raw_id: &str) -> anyhow::Result<()> {
    let id = ProductId::parse(raw_id)?;
    let chain = build_default_chain(config).context("failed to build source chain")?;

    let resolution = chain.resolve_detailed(&id).await;
    for attempt in &resolution.attempts {
        tracing::info!(
            product_id = %id,
            source = %attempt.source,
            outcome = ?attempt.outcome,
            "source attempt"
        );
    }
    print_json(&resolution.record)
}

pub(crate) async fn run_batch(
    config: &AppConfig,
    ids: &[String],
    max_batch: Option<usize>,
    no_pacing: bool,
) -> anyhow::Result<()> {
    let policy = batch_policy(config.batch, max_batch, no_pacing)?;
    let chain = build_default_chain(config).context("failed to build source chain")?;
    let orchestrator = BatchOrchestrator::new(chain, policy);

    let result = orchestrator.resolve_batch(ids).await?;
    print_json(&result)
}

pub(crate) fn run_addresses(config: &AppConfig, raw_id: &str) -> anyhow::Result<()> {
    let id = ProductId::parse(raw_id)?;
    let urls: Vec<String> = synthesize(&id, &config.sources)
        .iter()
        .map(CandidateAddress::url)
        .collect();
    print_json(&urls)
}

/// Applies command-line overrides to the configured batch policy.
pub(crate) fn batch_policy(
    configured: BatchPolicy,
    max_batch: Option<usize>,
    no_pacing: bool,
) -> anyhow::Result<BatchPolicy> {
    let mut policy = configured;
    if let Some(max) = max_batch {
        anyhow::ensure!(max >= 1, "--max-batch must be at least 1");
        policy.max_batch = max;
    }
    if no_pacing {
        policy.pacing_delay = Duration::ZERO;
        policy.pacing_jitter = Duration::ZERO;
    }
    Ok(policy)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{text}");
    Ok(())
}
