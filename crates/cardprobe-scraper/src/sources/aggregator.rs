use std::time::Duration;

use cardprobe_core::{ProductId, SourceKind};
use futures::future::{BoxFuture, FutureExt};
use reqwest::Client;

use super::catalog::{fetch_catalog_product, CatalogRequest};
use super::{RawPayload, SourceAdapter};
use crate::error::FetchError;

/// Direct catalog lookup; the id travels in the `nm` query parameter.
pub struct AggregatorAdapter {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl AggregatorAdapter {
    #[must_use]
    pub fn new(client: Client, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        }
    }
}

impl SourceAdapter for AggregatorAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Aggregator
    }

    fn fetch<'a>(&'a self, id: &'a ProductId) -> BoxFuture<'a, Result<RawPayload, FetchError>> {
        let request = CatalogRequest {
            client: &self.client,
            endpoint: &self.endpoint,
            param: "nm",
            timeout: self.timeout,
            source: SourceKind::Aggregator,
        };
        fetch_catalog_product(request, id).boxed()
    }
}
