//! Product page fallback. Fetches the public product page and extracts the
//! fields from static markup.

use std::sync::LazyLock;
use std::time::Duration;

use cardprobe_core::{ProductId, SourceKind, SourcesConfig};
use futures::future::{BoxFuture, FutureExt};
use reqwest::{Client, StatusCode};
use scraper::Selector;
use serde_json::{json, Value};

use super::dom::{child_text, selector, Document};
use super::{RawPayload, SourceAdapter};
use crate::client::content_encoding;
use crate::error::FetchError;
use crate::parse::{clean_title, parse_price_text, scan_price};

static H1: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static OG_TITLE: LazyLock<Selector> = LazyLock::new(|| selector("meta[property='og:title']"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector("meta[name='description']"));
static BRAND: LazyLock<Selector> = LazyLock::new(|| {
    selector(".product-page__header-brand, .product-page__brand, [itemprop='brand']")
});
static RATING: LazyLock<Selector> =
    LazyLock::new(|| selector(".product-review__rating, [itemprop='ratingValue']"));
static FINAL_PRICE: LazyLock<Selector> =
    LazyLock::new(|| selector("ins.price-block__final-price, .price-block__final-price"));
static PARAM_ITEM: LazyLock<Selector> = LazyLock::new(|| selector(".product-params__item"));
static PARAM_LABEL: LazyLock<Selector> = LazyLock::new(|| selector(".product-params__label"));
static PARAM_VALUE: LazyLock<Selector> = LazyLock::new(|| selector(".product-params__value"));
static PARAM_ROW: LazyLock<Selector> =
    LazyLock::new(|| selector("table.product-params__table tr"));
static ROW_HEADER: LazyLock<Selector> = LazyLock::new(|| selector("th"));
static ROW_CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));

pub struct RenderedPageAdapter {
    client: Client,
    page_url_template: String,
    error_markers: Vec<String>,
    min_page_bytes: usize,
    timeout: Duration,
}

impl RenderedPageAdapter {
    #[must_use]
    pub fn new(client: Client, sources: &SourcesConfig, timeout: Duration) -> Self {
        Self {
            client,
            page_url_template: sources.page_url_template.clone(),
            error_markers: sources.error_markers.clone(),
            min_page_bytes: sources.min_page_bytes,
            timeout,
        }
    }

    async fn fetch_page(&self, id: &ProductId) -> Result<RawPayload, FetchError> {
        let url = self
            .page_url_template
            .replace(cardprobe_core::sources::PAGE_ID_PLACEHOLDER, id.as_str());
        let response = self.client.get(&url).timeout(self.timeout).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let encoding = content_encoding(&response);
        let markup = response.text().await?;
        if let Some(reason) = error_shell_reason(&markup, &self.error_markers, self.min_page_bytes)
        {
            return Err(FetchError::ErrorPage { url, reason });
        }

        let body = extract_page(&markup);
        tracing::debug!(product_id = %id, %url, "product page extracted");

        Ok(RawPayload {
            source: SourceKind::RenderedPage,
            content_encoding: encoding,
            url,
            body,
        })
    }
}

impl SourceAdapter for RenderedPageAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::RenderedPage
    }

    fn fetch<'a>(&'a self, id: &'a ProductId) -> BoxFuture<'a, Result<RawPayload, FetchError>> {
        self.fetch_page(id).boxed()
    }
}

/// Why `markup` is an error shell rather than a product page, if it is one.
pub(super) fn error_shell_reason(
    markup: &str,
    markers: &[String],
    min_bytes: usize,
) -> Option<String> {
    if markup.len() < min_bytes {
        return Some(format!(
            "page is {} bytes, below the {min_bytes}-byte minimum",
            markup.len()
        ));
    }
    markers
        .iter()
        .find(|marker| !marker.is_empty() && markup.contains(marker.as_str()))
        .map(|marker| format!("page contains error marker \"{marker}\""))
}

/// Extracts the product fields from page markup into a flat JSON object.
///
/// The parsed document lives only inside this call.
pub(super) fn extract_page(markup: &str) -> Value {
    let doc = Document::parse(markup);

    let title = doc
        .text(&H1)
        .or_else(|| doc.attr(&OG_TITLE, "content"))
        .or_else(|| doc.text(&TITLE))
        .map(|raw| clean_title(&raw))
        .unwrap_or_default();

    let price = doc
        .text(&FINAL_PRICE)
        .and_then(|text| parse_price_text(&text))
        .or_else(|| scan_price(markup));

    let mut characteristics: Vec<Value> = doc
        .all(&PARAM_ITEM)
        .filter_map(|item| {
            let name = child_text(&item, &PARAM_LABEL)?;
            let value = child_text(&item, &PARAM_VALUE)?;
            Some(json!({"name": name, "value": value}))
        })
        .collect();
    characteristics.extend(doc.all(&PARAM_ROW).filter_map(|row| {
        let name = child_text(&row, &ROW_HEADER)?;
        let value = child_text(&row, &ROW_CELL)?;
        Some(json!({"name": name, "value": value}))
    }));

    tracing::trace!(
        param_items = doc.count(&PARAM_ITEM),
        param_rows = doc.count(&PARAM_ROW),
        has_price = price.is_some(),
        "page fields located"
    );

    json!({
        "title": title,
        "description": doc.attr(&META_DESCRIPTION, "content").unwrap_or_default(),
        "brand": doc.text(&BRAND).unwrap_or_default(),
        "rating": doc.text(&RATING).unwrap_or_default(),
        "price": price,
        "characteristics": characteristics,
    })
}

#[cfg(test)]
#[path = "page_test.rs"]
mod tests;
