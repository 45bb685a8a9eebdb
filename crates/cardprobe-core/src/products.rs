use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::CoreError;

/// Most characteristics kept on a record; extra pairs from a source are dropped.
pub const MAX_CHARACTERISTICS: usize = 10;

/// Joins rendered characteristic pairs in the serialized record.
pub const CHARACTERISTICS_SEPARATOR: &str = "::";

/// Separates a characteristic's name from its value inside one rendered pair.
pub const PAIR_SEPARATOR: &str = " / ";

/// A numeric product identifier: non-empty, ASCII digits only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

impl ProductId {
    /// Validates `raw` as a product identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidProductId`] if `raw` is empty or contains
    /// anything other than ASCII digits.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidProductId(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of digits in the identifier.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`: a parsed identifier has at least one digit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if `value`, ignoring surrounding whitespace, is this identifier.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        value.trim() == self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProductId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ProductId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

/// Which upstream produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    StorageCard,
    Aggregator,
    Search,
    RenderedPage,
    /// No source yielded an informative record.
    None,
}

impl SourceKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::StorageCard => "storage_card",
            SourceKind::Aggregator => "aggregator",
            SourceKind::Search => "search",
            SourceKind::RenderedPage => "rendered_page",
            SourceKind::None => "none",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One name/value pair describing a product (e.g. `"Цвет"` / `"черный"`).
///
/// The constructor collapses [`CHARACTERISTICS_SEPARATOR`] occurrences in
/// either half, and [`PAIR_SEPARATOR`] in the name, so that a joined list
/// splits back into the same pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Characteristic {
    name: String,
    value: String,
}

impl Characteristic {
    #[must_use]
    pub fn new(name: &str, value: &str) -> Self {
        let name = sanitize_part(name).replace(PAIR_SEPARATOR, "/");
        // A trailing slash would fuse with the pair separator.
        let name = name.trim_end_matches(|c: char| c == '/' || c.is_whitespace());
        Self {
            name: name.to_string(),
            value: sanitize_part(value),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Renders the pair as `name / value`.
    #[must_use]
    pub fn render(&self) -> String {
        format!("{}{PAIR_SEPARATOR}{}", self.name, self.value)
    }
}

fn sanitize_part(raw: &str) -> String {
    let mut text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    while text.contains(CHARACTERISTICS_SEPARATOR) {
        text = text.replace(CHARACTERISTICS_SEPARATOR, ":");
    }
    // An edge colon would merge with the join separator.
    text.trim_matches(':').trim().to_string()
}

/// Joins characteristics into their wire form.
#[must_use]
pub fn join_characteristics(items: &[Characteristic]) -> String {
    items
        .iter()
        .map(Characteristic::render)
        .collect::<Vec<_>>()
        .join(CHARACTERISTICS_SEPARATOR)
}

/// Splits the wire form back into pairs. Empty segments are skipped; a
/// segment without a pair separator becomes a name with an empty value.
#[must_use]
pub fn split_characteristics(joined: &str) -> Vec<Characteristic> {
    joined
        .split(CHARACTERISTICS_SEPARATOR)
        .filter(|segment| !segment.trim().is_empty())
        .map(|segment| match segment.split_once(PAIR_SEPARATOR) {
            Some((name, value)) => Characteristic::new(name, value),
            None => Characteristic::new(segment, ""),
        })
        .collect()
}

fn serialize_characteristics<S>(items: &[Characteristic], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&join_characteristics(items))
}

fn deserialize_characteristics<'de, D>(deserializer: D) -> Result<Vec<Characteristic>, D::Error>
where
    D: Deserializer<'de>,
{
    let joined = String::deserialize(deserializer)?;
    Ok(split_characteristics(&joined))
}

/// The canonical product record returned for every resolution attempt.
///
/// Text fields are empty strings when unknown, never absent. A record is
/// built once and not updated afterwards: the first informative source wins
/// and later sources are not consulted to fill gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    /// Product title, or [`ProductRecord::placeholder_name`] when no source had one.
    pub name: String,
    pub brand: String,
    pub category: String,
    pub description: String,
    /// At most [`MAX_CHARACTERISTICS`] pairs in source order, serialized as a
    /// `::`-joined string of `name / value` pairs.
    #[serde(
        serialize_with = "serialize_characteristics",
        deserialize_with = "deserialize_characteristics"
    )]
    pub characteristics: Vec<Characteristic>,
    /// Price in whole currency units.
    pub price: Option<u64>,
    pub rating: String,
    pub source_strategy: SourceKind,
    pub success: bool,
    /// Diagnostic text; present exactly when `success` is `false`.
    pub error: Option<String>,
}

impl ProductRecord {
    /// The synthesized title used when no source supplies one.
    #[must_use]
    pub fn placeholder_name(id: &ProductId) -> String {
        format!("Product {id}")
    }

    /// The terminal record for an identifier no source could resolve.
    #[must_use]
    pub fn unresolved(id: ProductId, diagnostic: String) -> Self {
        Self {
            name: Self::placeholder_name(&id),
            id,
            brand: String::new(),
            category: String::new(),
            description: String::new(),
            characteristics: Vec::new(),
            price: None,
            rating: String::new(),
            source_strategy: SourceKind::None,
            success: false,
            error: Some(diagnostic),
        }
    }

    /// Returns `true` if the record carries a real title: non-empty and not
    /// the synthesized placeholder for its id.
    #[must_use]
    pub fn is_informative(&self) -> bool {
        let name = self.name.trim();
        !name.is_empty() && name != Self::placeholder_name(&self.id)
    }

    /// The characteristics in their joined wire form.
    #[must_use]
    pub fn characteristics_string(&self) -> String {
        join_characteristics(&self.characteristics)
    }
}

/// Aggregate outcome of a batch resolution.
///
/// `successful + failed + skipped == total`. `skipped` is non-zero only when
/// a batch deadline cut the run short.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
    pub results: Vec<ProductRecord>,
}

impl BatchResult {
    /// Builds the summary for `requested` identifiers from the records that
    /// were produced before the batch stopped.
    #[must_use]
    pub fn from_records(requested: usize, results: Vec<ProductRecord>) -> Self {
        let successful = results.iter().filter(|r| r.success).count();
        let failed = results.len() - successful;
        Self {
            total: requested,
            successful,
            failed,
            skipped: requested.saturating_sub(results.len()),
            results,
        }
    }
}
