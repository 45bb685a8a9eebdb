//! Sharded card storage: walks the synthesized candidate addresses until one
//! mirror returns the card for the requested identifier.

use std::time::Duration;

use cardprobe_core::{ProductId, SourceKind, SourcesConfig};
use futures::future::{BoxFuture, FutureExt};
use reqwest::header::{HeaderValue, ACCEPT, ACCEPT_ENCODING};
use reqwest::{Client, StatusCode};
use serde_json::Value;

use super::{json_id_matches, RawPayload, SourceAdapter};
use crate::address::synthesize;
use crate::client::{content_encoding, ACCEPT_JSON};
use crate::error::FetchError;

const NEGOTIATED_ENCODINGS: &str = "gzip, deflate, br";
const IDENTITY_ENCODING: &str = "identity";

/// Streaming compression the client cannot decode locally.
fn is_undecodable_encoding(encoding: &str) -> bool {
    encoding.split(',').any(|e| e.trim() == "br")
}

pub struct StorageCardAdapter {
    client: Client,
    sources: SourcesConfig,
    timeout: Duration,
}

impl StorageCardAdapter {
    #[must_use]
    pub fn new(client: Client, sources: SourcesConfig, timeout: Duration) -> Self {
        Self {
            client,
            sources,
            timeout,
        }
    }

    async fn fetch_card(&self, id: &ProductId) -> Result<RawPayload, FetchError> {
        let candidates = synthesize(id, &self.sources);
        let attempted = candidates.len();

        for candidate in &candidates {
            let url = candidate.url();
            match self.try_candidate(&url, id).await {
                Ok(payload) => {
                    tracing::debug!(product_id = %id, %url, "storage card found");
                    return Ok(payload);
                }
                Err(e) => {
                    tracing::debug!(
                        product_id = %id,
                        %url,
                        error = %e,
                        "storage candidate rejected"
                    );
                }
            }
        }

        Err(FetchError::CandidatesExhausted {
            id: id.to_string(),
            attempted,
        })
    }

    /// One candidate attempt. A brotli-encoded answer is re-requested once
    /// with compression disabled; that is still the same candidate.
    async fn try_candidate(&self, url: &str, id: &ProductId) -> Result<RawPayload, FetchError> {
        let mut response = self.get(url, NEGOTIATED_ENCODINGS).await?;
        let mut encoding = content_encoding(&response);

        if response.status() == StatusCode::OK
            && encoding.as_deref().is_some_and(is_undecodable_encoding)
        {
            tracing::debug!(url, "card served with brotli; re-requesting uncompressed");
            response = self.get(url, IDENTITY_ENCODING).await?;
            encoding = content_encoding(&response);
        }

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        let card = serde_json::from_str::<Value>(&body).map_err(|e| FetchError::Deserialize {
            context: format!("storage card {url}"),
            source: e,
        })?;

        if !json_id_matches(card.get("nm_id"), id) {
            return Err(FetchError::Validation {
                id: id.to_string(),
                reason: format!("card at {url} belongs to a different product"),
            });
        }

        Ok(RawPayload {
            source: SourceKind::StorageCard,
            content_encoding: encoding,
            url: url.to_owned(),
            body: card,
        })
    }

    async fn get(
        &self,
        url: &str,
        accept_encoding: &'static str,
    ) -> Result<reqwest::Response, FetchError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, ACCEPT_JSON)
            .header(ACCEPT_ENCODING, HeaderValue::from_static(accept_encoding))
            .timeout(self.timeout)
            .send()
            .await?;
        Ok(response)
    }
}

impl SourceAdapter for StorageCardAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::StorageCard
    }

    fn fetch<'a>(&'a self, id: &'a ProductId) -> BoxFuture<'a, Result<RawPayload, FetchError>> {
        self.fetch_card(id).boxed()
    }
}
