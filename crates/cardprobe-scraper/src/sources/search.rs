use std::time::Duration;

use cardprobe_core::{ProductId, SourceKind};
use futures::future::{BoxFuture, FutureExt};
use reqwest::Client;

use super::catalog::{fetch_catalog_product, CatalogRequest};
use super::{RawPayload, SourceAdapter};
use crate::error::FetchError;

/// Free-text search with the id as the query. Some products resolve only
/// through the search index.
pub struct SearchAdapter {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl SearchAdapter {
    #[must_use]
    pub fn new(client: Client, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        }
    }
}

impl SourceAdapter for SearchAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Search
    }

    fn fetch<'a>(&'a self, id: &'a ProductId) -> BoxFuture<'a, Result<RawPayload, FetchError>> {
        let request = CatalogRequest {
            client: &self.client,
            endpoint: &self.endpoint,
            param: "query",
            timeout: self.timeout,
            source: SourceKind::Search,
        };
        fetch_catalog_product(request, id).boxed()
    }
}
