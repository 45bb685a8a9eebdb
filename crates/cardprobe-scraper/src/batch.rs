//! Batch orchestration: validates the whole input up front, then resolves
//! identifiers one at a time with a pacing pause between them.

use std::time::Instant;

use cardprobe_core::{BatchPolicy, BatchResult, ProductId};

use crate::chain::StrategyChain;
use crate::error::BatchError;
use crate::pacing;

/// Checks a raw batch against `max_batch` and parses every identifier.
///
/// # Errors
///
/// Returns [`BatchError`] for an empty batch, one longer than `max_batch`,
/// or the first identifier that is not all digits. Nothing is resolved when
/// validation fails.
pub fn validate_batch(ids: &[String], max_batch: usize) -> Result<Vec<ProductId>, BatchError> {
    if ids.is_empty() {
        return Err(BatchError::Empty);
    }
    if ids.len() > max_batch {
        return Err(BatchError::TooLarge {
            len: ids.len(),
            max: max_batch,
        });
    }
    ids.iter()
        .enumerate()
        .map(|(index, raw)| {
            ProductId::parse(raw).map_err(|_| BatchError::InvalidId {
                index,
                value: raw.clone(),
            })
        })
        .collect()
}

pub struct BatchOrchestrator {
    chain: StrategyChain,
    policy: BatchPolicy,
}

impl BatchOrchestrator {
    #[must_use]
    pub fn new(chain: StrategyChain, policy: BatchPolicy) -> Self {
        Self { chain, policy }
    }

    #[must_use]
    pub fn chain(&self) -> &StrategyChain {
        &self.chain
    }

    #[must_use]
    pub fn policy(&self) -> &BatchPolicy {
        &self.policy
    }

    /// Resolves every identifier in order.
    ///
    /// Once validation passes this never fails: unresolved identifiers are
    /// records with `success == false`. When the policy has a deadline it is
    /// checked between items, and identifiers not started in time are
    /// counted as `skipped`.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError`] if the input fails [`validate_batch`].
    pub async fn resolve_batch(&self, ids: &[String]) -> Result<BatchResult, BatchError> {
        let ids = validate_batch(ids, self.policy.max_batch)?;
        let started = Instant::now();
        let mut results = Vec::with_capacity(ids.len());

        for (index, id) in ids.iter().enumerate() {
            if index > 0 {
                if !self.deadline_passed(started) {
                    pacing::pause(&self.policy).await;
                }
                if self.deadline_passed(started) {
                    tracing::warn!(
                        completed = index,
                        remaining = ids.len() - index,
                        "batch deadline reached; skipping remaining identifiers"
                    );
                    break;
                }
            }
            tracing::debug!(product_id = %id, position = index + 1, total = ids.len(), "resolving");
            results.push(self.chain.resolve(id).await);
        }

        let summary = BatchResult::from_records(ids.len(), results);
        tracing::info!(
            total = summary.total,
            successful = summary.successful,
            failed = summary.failed,
            skipped = summary.skipped,
            "batch complete"
        );
        Ok(summary)
    }

    fn deadline_passed(&self, started: Instant) -> bool {
        self.policy
            .deadline
            .is_some_and(|deadline| started.elapsed() >= deadline)
    }
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod tests;
