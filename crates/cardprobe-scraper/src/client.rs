//! Shared HTTP client construction and the browser request profile.

use std::time::Duration;

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONTENT_ENCODING,
    DNT, UPGRADE_INSECURE_REQUESTS,
};
use reqwest::Client;

use crate::error::FetchError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";
pub(crate) const ACCEPT_JSON: &str = "application/json, text/plain, */*";

/// Builds the single `reqwest::Client` shared by every adapter.
///
/// Per-adapter timeouts are applied on each request rather than here, so
/// one client (and its connection pool) serves all sources.
///
/// # Errors
///
/// Returns [`FetchError::Http`] if the underlying client cannot be
/// constructed (e.g., invalid TLS config).
pub fn build_http_client(user_agent: &str) -> Result<Client, FetchError> {
    let client = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent(user_agent)
        .default_headers(browser_headers())
        .build()?;
    Ok(client)
}

/// Headers a desktop browser sends on a top-level navigation.
///
/// Upstreams serve bot shells to clients that omit them.
pub(crate) fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7"),
    );
    headers.insert(DNT, HeaderValue::from_static("1"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    for (name, value) in [
        ("sec-fetch-dest", "document"),
        ("sec-fetch-mode", "navigate"),
        ("sec-fetch-site", "none"),
    ] {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    headers
}

/// The `Content-Encoding` the server reported, lower-cased.
pub(crate) fn content_encoding(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty())
}
