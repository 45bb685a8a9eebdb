//! Source adapters.
//!
//! Each upstream kind is one [`SourceAdapter`]: a fetch-and-decode unit that
//! turns an identifier into a [`RawPayload`] or a [`FetchError`]. The strategy
//! chain holds them as trait objects and knows nothing of their internals.

mod aggregator;
mod catalog;
mod dom;
mod page;
mod search;
mod storage_card;

pub use aggregator::AggregatorAdapter;
pub use page::RenderedPageAdapter;
pub use search::SearchAdapter;
pub use storage_card::StorageCardAdapter;

use cardprobe_core::{ProductId, SourceKind};
use futures::future::BoxFuture;
use serde_json::Value;

use crate::error::FetchError;

/// A decoded upstream response, owned by the adapter call that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPayload {
    pub source: SourceKind,
    /// `Content-Encoding` of the response the payload was read from.
    pub content_encoding: Option<String>,
    pub url: String,
    /// The product object for JSON sources, or the extracted page fields
    /// for the rendered page.
    pub body: Value,
}

pub trait SourceAdapter: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Fetches and decodes the upstream data for `id`.
    ///
    /// Non-success statuses and malformed bodies are returned as
    /// [`FetchError`]s, never panics.
    fn fetch<'a>(&'a self, id: &'a ProductId) -> BoxFuture<'a, Result<RawPayload, FetchError>>;
}

/// Returns `true` if a JSON id field (number or string) names `id`.
pub(crate) fn json_id_matches(value: Option<&Value>, id: &ProductId) -> bool {
    match value {
        Some(Value::Number(n)) => id.matches(&n.to_string()),
        Some(Value::String(s)) => id.matches(s),
        _ => false,
    }
}
