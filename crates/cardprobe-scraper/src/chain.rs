//! The ordered strategy chain.
//!
//! Adapters run strictly one after another in their configured order. The
//! first adapter whose payload normalizes to an informative record wins; any
//! adapter error or non-informative payload is recorded as an [`Attempt`] and
//! the chain moves on. Exhaustion yields a placeholder record with
//! `success == false`, never an error.

use cardprobe_core::{AppConfig, ProductId, ProductRecord, SourceKind};

use crate::client::build_http_client;
use crate::error::{FailureKind, FetchError};
use crate::normalize::normalize;
use crate::sources::{
    AggregatorAdapter, RenderedPageAdapter, SearchAdapter, SourceAdapter, StorageCardAdapter,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Resolved,
    /// The adapter answered but the payload carried no usable name.
    NotInformative,
    Failed { kind: FailureKind, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub source: SourceKind,
    pub outcome: AttemptOutcome,
}

impl Attempt {
    fn describe(&self) -> String {
        match &self.outcome {
            AttemptOutcome::Resolved => format!("{}: resolved", self.source),
            AttemptOutcome::NotInformative => format!("{}: no usable product name", self.source),
            AttemptOutcome::Failed { reason, .. } => format!("{}: {reason}", self.source),
        }
    }
}

/// A resolved (or placeholder) record together with the attempts made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub record: ProductRecord,
    pub attempts: Vec<Attempt>,
}

pub struct StrategyChain {
    adapters: Vec<Box<dyn SourceAdapter>>,
}

impl StrategyChain {
    #[must_use]
    pub fn new(adapters: Vec<Box<dyn SourceAdapter>>) -> Self {
        Self { adapters }
    }

    /// Adapter kinds in the order they are tried.
    #[must_use]
    pub fn sources(&self) -> Vec<SourceKind> {
        self.adapters.iter().map(|a| a.kind()).collect()
    }

    pub async fn resolve(&self, id: &ProductId) -> ProductRecord {
        self.resolve_detailed(id).await.record
    }

    pub async fn resolve_detailed(&self, id: &ProductId) -> Resolution {
        let mut attempts = Vec::with_capacity(self.adapters.len());

        for adapter in &self.adapters {
            let source = adapter.kind();
            match adapter.fetch(id).await {
                Ok(payload) => {
                    let record = normalize(&payload, id);
                    if record.is_informative() {
                        tracing::info!(
                            product_id = %id,
                            %source,
                            url = %payload.url,
                            "product resolved"
                        );
                        attempts.push(Attempt {
                            source,
                            outcome: AttemptOutcome::Resolved,
                        });
                        return Resolution { record, attempts };
                    }
                    tracing::debug!(product_id = %id, %source, "payload had no usable name");
                    attempts.push(Attempt {
                        source,
                        outcome: AttemptOutcome::NotInformative,
                    });
                }
                Err(e) => {
                    tracing::debug!(
                        product_id = %id,
                        %source,
                        kind = %e.kind(),
                        error = %e,
                        "source failed"
                    );
                    attempts.push(failed_attempt(source, &e));
                }
            }
        }

        let diagnostic = describe_attempts(&attempts);
        tracing::warn!(product_id = %id, %diagnostic, "all sources exhausted");
        Resolution {
            record: ProductRecord::unresolved(id.clone(), diagnostic),
            attempts,
        }
    }
}

fn failed_attempt(source: SourceKind, error: &FetchError) -> Attempt {
    Attempt {
        source,
        outcome: AttemptOutcome::Failed {
            kind: error.kind(),
            reason: error.to_string(),
        },
    }
}

/// `source: reason; source: reason` in attempt order.
fn describe_attempts(attempts: &[Attempt]) -> String {
    if attempts.is_empty() {
        return "no sources configured".to_string();
    }
    attempts
        .iter()
        .map(Attempt::describe)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Builds the production chain: storage card, aggregator, search, then the
/// product page, all sharing one HTTP client.
///
/// # Errors
///
/// Returns [`FetchError::Http`] if the HTTP client cannot be constructed.
pub fn build_default_chain(config: &AppConfig) -> Result<StrategyChain, FetchError> {
    let client = build_http_client(&config.user_agent)?;
    let sources = &config.sources;
    let timeouts = &config.timeouts;

    let adapters: Vec<Box<dyn SourceAdapter>> = vec![
        Box::new(StorageCardAdapter::new(
            client.clone(),
            sources.clone(),
            timeouts.storage_card,
        )),
        Box::new(AggregatorAdapter::new(
            client.clone(),
            sources.aggregator_url.clone(),
            timeouts.catalog_api,
        )),
        Box::new(SearchAdapter::new(
            client.clone(),
            sources.search_url.clone(),
            timeouts.catalog_api,
        )),
        Box::new(RenderedPageAdapter::new(
            client,
            sources,
            timeouts.rendered_page,
        )),
    ];
    Ok(StrategyChain::new(adapters))
}

#[cfg(test)]
#[path = "chain_test.rs"]
mod tests;
