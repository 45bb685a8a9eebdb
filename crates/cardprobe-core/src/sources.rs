//! Upstream source configuration: storage mirrors, shard cutoffs, and the
//! catalog/search/page endpoints.
//!
//! Every field has a built-in default pointing at the production services.
//! A YAML file (see [`load_sources`]) may override any subset of them; tests
//! build the struct directly with mock-server URLs.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Placeholder substituted with the product id in [`SourcesConfig::page_url_template`].
pub const PAGE_ID_PLACEHOLDER: &str = "{id}";

/// How the volume and part shard prefixes are cut from an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ShardCutoff {
    /// Both prefixes are the whole identifier.
    Whole,
    /// Keep the first `volume` / `part` digits.
    Leading { volume: usize, part: usize },
    /// Drop the last `volume` / `part` digits.
    Trim { volume: usize, part: usize },
}

/// One row of the length-indexed cutoff table.
///
/// Applies to identifiers whose digit count lies in `min_len..=max_len`
/// (`max_len: None` is unbounded). Cutoffs are tried in listed order; a rule
/// with more than one cutoff covers boundary lengths where the upstream
/// layout is ambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardRule {
    pub min_len: usize,
    #[serde(default)]
    pub max_len: Option<usize>,
    pub cutoffs: Vec<ShardCutoff>,
}

impl ShardRule {
    #[must_use]
    pub fn matches(&self, len: usize) -> bool {
        len >= self.min_len && self.max_len.is_none_or(|max| len <= max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Storage mirror base URLs, tried in listed order.
    pub mirror_hosts: Vec<String>,
    pub shard_rules: Vec<ShardRule>,
    /// Catalog lookup endpoint; the id is appended as the `nm` query parameter.
    pub aggregator_url: String,
    /// Search endpoint; the id is appended as the `query` query parameter.
    pub search_url: String,
    /// Product page URL containing [`PAGE_ID_PLACEHOLDER`].
    pub page_url_template: String,
    /// Substrings that identify an error shell served with a 200 status.
    pub error_markers: Vec<String>,
    /// Pages shorter than this many bytes are treated as error shells.
    pub min_page_bytes: usize,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            mirror_hosts: (1..=12)
                .map(|n| format!("https://basket-{n:02}.wbbasket.ru"))
                .collect(),
            shard_rules: default_shard_rules(),
            aggregator_url:
                "https://card.wb.ru/cards/v2/detail?appType=1&curr=rub&dest=-1257786&spp=30"
                    .to_string(),
            search_url: "https://search.wb.ru/exactmatch/ru/common/v4/search?appType=1&curr=rub&dest=-1257786&resultset=catalog&sort=popular&spp=30".to_string(),
            page_url_template: "https://www.wildberries.ru/catalog/{id}/detail.aspx".to_string(),
            error_markers: vec![
                "Что-то пошло не так".to_string(),
                "Страница не найдена".to_string(),
                "Just a moment...".to_string(),
            ],
            min_page_bytes: 1_000,
        }
    }
}

impl SourcesConfig {
    /// Returns the first shard rule covering an identifier of `len` digits.
    #[must_use]
    pub fn shard_rule_for(&self, len: usize) -> Option<&ShardRule> {
        self.shard_rules.iter().find(|rule| rule.matches(len))
    }

    /// Builds the product page URL for `id`.
    #[must_use]
    pub fn page_url(&self, id: &str) -> String {
        self.page_url_template.replace(PAGE_ID_PLACEHOLDER, id)
    }
}

/// The built-in cutoff table.
///
/// Seven digits and up follow the storage layout directly (volume = id without
/// its last five digits, part = id without its last three). Five- and six-digit
/// ids are ambiguous across mirrors, so both the one/three and two/four leading
/// cuts are generated. Four digits and fewer use the whole id.
#[must_use]
pub fn default_shard_rules() -> Vec<ShardRule> {
    vec![
        ShardRule {
            min_len: 1,
            max_len: Some(4),
            cutoffs: vec![ShardCutoff::Whole],
        },
        ShardRule {
            min_len: 5,
            max_len: Some(6),
            cutoffs: vec![
                ShardCutoff::Leading { volume: 1, part: 3 },
                ShardCutoff::Leading { volume: 2, part: 4 },
            ],
        },
        ShardRule {
            min_len: 7,
            max_len: None,
            cutoffs: vec![ShardCutoff::Trim { volume: 5, part: 3 }],
        },
    ]
}

/// Load and validate a sources configuration from a YAML file.
///
/// Fields missing from the file keep their built-in defaults.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sources(path: &Path) -> Result<SourcesConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SourcesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_sources(&content)
}

/// Parse and validate a sources configuration from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the text does not parse or fails validation.
pub fn parse_sources(content: &str) -> Result<SourcesConfig, ConfigError> {
    let sources: SourcesConfig = serde_yaml::from_str(content)?;
    validate_sources(&sources)?;
    Ok(sources)
}

fn validate_sources(sources: &SourcesConfig) -> Result<(), ConfigError> {
    if sources.mirror_hosts.is_empty() {
        return Err(ConfigError::Validation(
            "at least one mirror host is required".to_string(),
        ));
    }

    let mut seen_hosts = HashSet::new();
    for host in &sources.mirror_hosts {
        if !is_http_url(host) {
            return Err(ConfigError::Validation(format!(
                "mirror host '{host}' must be an absolute http(s) URL"
            )));
        }
        if !seen_hosts.insert(host.trim_end_matches('/').to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate mirror host: '{host}'"
            )));
        }
    }

    for (label, url) in [
        ("aggregator_url", &sources.aggregator_url),
        ("search_url", &sources.search_url),
        ("page_url_template", &sources.page_url_template),
    ] {
        if !is_http_url(url) {
            return Err(ConfigError::Validation(format!(
                "{label} '{url}' must be an absolute http(s) URL"
            )));
        }
    }

    if !sources.page_url_template.contains(PAGE_ID_PLACEHOLDER) {
        return Err(ConfigError::Validation(format!(
            "page_url_template must contain the {PAGE_ID_PLACEHOLDER} placeholder"
        )));
    }

    validate_shard_rules(&sources.shard_rules)
}

fn validate_shard_rules(rules: &[ShardRule]) -> Result<(), ConfigError> {
    if rules.is_empty() {
        return Err(ConfigError::Validation(
            "shard_rules must contain at least one rule".to_string(),
        ));
    }

    for (idx, rule) in rules.iter().enumerate() {
        if rule.min_len == 0 {
            return Err(ConfigError::Validation(format!(
                "shard rule {idx} has min_len 0; identifiers have at least one digit"
            )));
        }
        if rule.max_len.is_some_and(|max| max < rule.min_len) {
            return Err(ConfigError::Validation(format!(
                "shard rule {idx} has max_len below min_len"
            )));
        }
        if rule.cutoffs.is_empty() {
            return Err(ConfigError::Validation(format!(
                "shard rule {idx} has no cutoffs"
            )));
        }
        for (other_idx, other) in rules.iter().enumerate().skip(idx + 1) {
            if ranges_overlap(rule, other) {
                return Err(ConfigError::Validation(format!(
                    "shard rules {idx} and {other_idx} cover overlapping lengths"
                )));
            }
        }
    }

    Ok(())
}

fn ranges_overlap(a: &ShardRule, b: &ShardRule) -> bool {
    let a_max = a.max_len.unwrap_or(usize::MAX);
    let b_max = b.max_len.unwrap_or(usize::MAX);
    a.min_len <= b_max && b.min_len <= a_max
}

fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    rest.is_some_and(|r| !r.is_empty() && !r.starts_with('/'))
}

#[cfg(test)]
#[path = "sources_test.rs"]
mod tests;
