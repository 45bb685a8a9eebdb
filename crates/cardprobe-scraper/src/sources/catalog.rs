//! Shared request/selection logic for the two JSON catalog endpoints
//! (direct lookup and search). Both answer with a product list and differ
//! only in the endpoint and the query parameter carrying the id.

use std::time::Duration;

use cardprobe_core::{ProductId, SourceKind};
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use super::{json_id_matches, RawPayload};
use crate::client::{content_encoding, ACCEPT_JSON};
use crate::error::FetchError;

pub(super) struct CatalogRequest<'a> {
    pub client: &'a Client,
    pub endpoint: &'a str,
    /// Query parameter the identifier is sent in.
    pub param: &'static str,
    pub timeout: Duration,
    pub source: SourceKind,
}

pub(super) async fn fetch_catalog_product(
    request: CatalogRequest<'_>,
    id: &ProductId,
) -> Result<RawPayload, FetchError> {
    let url = catalog_url(request.endpoint, request.param, id.as_str())?;
    let response = request
        .client
        .get(&url)
        .header(ACCEPT, ACCEPT_JSON)
        .timeout(request.timeout)
        .send()
        .await?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::UnexpectedStatus {
            status: status.as_u16(),
            url,
        });
    }

    let encoding = content_encoding(&response);
    let body = response.text().await?;
    let parsed = serde_json::from_str::<Value>(&body).map_err(|e| FetchError::Deserialize {
        context: format!("{} response from {url}", request.source),
        source: e,
    })?;

    let product = select_product(&parsed, id).ok_or_else(|| FetchError::Validation {
        id: id.to_string(),
        reason: format!("{} returned no products", request.source),
    })?;

    Ok(RawPayload {
        source: request.source,
        content_encoding: encoding,
        url,
        body: product.clone(),
    })
}

/// Appends `param=id` to the endpoint, keeping its existing query.
pub(super) fn catalog_url(endpoint: &str, param: &str, id: &str) -> Result<String, FetchError> {
    let mut url = reqwest::Url::parse(endpoint).map_err(|e| FetchError::InvalidUrl {
        url: endpoint.to_owned(),
        reason: e.to_string(),
    })?;
    url.query_pairs_mut().append_pair(param, id);
    Ok(url.to_string())
}

/// The product whose `id` equals the requested one, else the first listed.
/// `None` when the list is missing or empty.
pub(super) fn select_product<'a>(body: &'a Value, id: &ProductId) -> Option<&'a Value> {
    let products = body
        .pointer("/data/products")
        .or_else(|| body.pointer("/products"))?
        .as_array()?;

    products
        .iter()
        .find(|product| json_id_matches(product.get("id"), id))
        .or_else(|| products.first())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn id(raw: &str) -> ProductId {
        ProductId::parse(raw).expect("valid id")
    }

    #[test]
    fn catalog_url_keeps_existing_query() {
        let url = catalog_url(
            "https://card.example.com/cards/v2/detail?appType=1&curr=rub",
            "nm",
            "18671335",
        )
        .unwrap();
        assert_eq!(
            url,
            "https://card.example.com/cards/v2/detail?appType=1&curr=rub&nm=18671335"
        );
    }

    #[test]
    fn catalog_url_without_query() {
        let url = catalog_url("https://search.example.com/search", "query", "42").unwrap();
        assert_eq!(url, "https://search.example.com/search?query=42");
    }

    #[test]
    fn catalog_url_rejects_relative_endpoint() {
        let err = catalog_url("/cards/detail", "nm", "42").unwrap_err();
        assert!(
            matches!(err, FetchError::InvalidUrl { .. }),
            "expected InvalidUrl, got: {err:?}"
        );
    }

    #[test]
    fn select_product_prefers_exact_id() {
        let body = json!({"data": {"products": [
            {"id": 111, "name": "first"},
            {"id": 18_671_335, "name": "exact"}
        ]}});
        let product = select_product(&body, &id("18671335")).unwrap();
        assert_eq!(product["name"], "exact");
    }

    #[test]
    fn select_product_falls_back_to_first() {
        let body = json!({"data": {"products": [
            {"id": 111, "name": "first"},
            {"id": 222, "name": "second"}
        ]}});
        let product = select_product(&body, &id("18671335")).unwrap();
        assert_eq!(product["name"], "first");
    }

    #[test]
    fn select_product_reads_top_level_list() {
        let body = json!({"products": [{"id": 5, "name": "top"}]});
        assert_eq!(select_product(&body, &id("5")).unwrap()["name"], "top");
    }

    #[test]
    fn select_product_none_for_empty_or_missing_list() {
        assert!(select_product(&json!({"data": {"products": []}}), &id("5")).is_none());
        assert!(select_product(&json!({"data": {}}), &id("5")).is_none());
        assert!(select_product(&json!({"products": "oops"}), &id("5")).is_none());
    }
}
