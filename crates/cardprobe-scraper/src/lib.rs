//! Cascading product resolution: candidate address synthesis, the four
//! upstream source adapters, normalization into [`ProductRecord`], the
//! ordered strategy chain, and the paced batch orchestrator.
//!
//! [`ProductRecord`]: cardprobe_core::ProductRecord

pub mod address;
pub mod batch;
pub mod chain;
pub mod client;
pub mod error;
pub mod field_map;
pub mod normalize;
mod pacing;
pub mod parse;
pub mod sources;

#[cfg(test)]
mod test_support;

pub use address::{synthesize, CandidateAddress};
pub use batch::{validate_batch, BatchOrchestrator};
pub use chain::{build_default_chain, Attempt, AttemptOutcome, Resolution, StrategyChain};
pub use client::build_http_client;
pub use error::{BatchError, FailureKind, FetchError};
pub use normalize::normalize;
pub use sources::{
    AggregatorAdapter, RawPayload, RenderedPageAdapter, SearchAdapter, SourceAdapter,
    StorageCardAdapter,
};
