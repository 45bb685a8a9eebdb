//! Declarative per-source field maps.
//!
//! Each [`FieldRule`] maps one canonical field to a list of alternative JSON
//! pointers into the source payload (first usable value wins) and names the
//! transform applied to the value found there. Adapting to an upstream
//! schema change means editing a table row, not normalizer code.

use cardprobe_core::SourceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Brand,
    Category,
    Description,
    Characteristics,
    Price,
    Rating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Trimmed, whitespace-collapsed string; numbers are rendered as text.
    Text,
    /// Integer price in minor currency units, divided by 100.
    MinorUnits,
    /// Price read from page text; kept only inside the plausibility bounds.
    ScrapedPrice,
    /// List of name/value objects (possibly grouped), capped and joined.
    Characteristics,
    /// Numeric or textual rating, rendered as text.
    Rating,
}

impl Transform {
    /// Whether this transform produces a value of the type `field` holds.
    #[must_use]
    pub fn fits(self, field: Field) -> bool {
        match self {
            Self::Text => matches!(
                field,
                Field::Name | Field::Brand | Field::Category | Field::Description
            ),
            Self::MinorUnits | Self::ScrapedPrice => field == Field::Price,
            Self::Characteristics => field == Field::Characteristics,
            Self::Rating => field == Field::Rating,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: Field,
    pub pointers: &'static [&'static str],
    pub transform: Transform,
}

const fn rule(
    field: Field,
    pointers: &'static [&'static str],
    transform: Transform,
) -> FieldRule {
    FieldRule {
        field,
        pointers,
        transform,
    }
}

const STORAGE_CARD_FIELDS: &[FieldRule] = &[
    rule(Field::Name, &["/imt_name"], Transform::Text),
    rule(Field::Brand, &["/selling/brand_name"], Transform::Text),
    rule(
        Field::Category,
        &["/subj_name", "/subj_root_name"],
        Transform::Text,
    ),
    rule(Field::Description, &["/description"], Transform::Text),
    rule(
        Field::Characteristics,
        &["/options", "/grouped_options"],
        Transform::Characteristics,
    ),
];

const CATALOG_FIELDS: &[FieldRule] = &[
    rule(Field::Name, &["/name"], Transform::Text),
    rule(Field::Brand, &["/brand"], Transform::Text),
    rule(
        Field::Category,
        &["/subjectName", "/entity"],
        Transform::Text,
    ),
    rule(
        Field::Price,
        &[
            "/salePriceU",
            "/priceU",
            "/sizes/0/price/product",
            "/sizes/0/price/total",
        ],
        Transform::MinorUnits,
    ),
    rule(
        Field::Rating,
        &["/reviewRating", "/rating"],
        Transform::Rating,
    ),
];

const PAGE_FIELDS: &[FieldRule] = &[
    rule(Field::Name, &["/title"], Transform::Text),
    rule(Field::Brand, &["/brand"], Transform::Text),
    rule(Field::Description, &["/description"], Transform::Text),
    rule(
        Field::Characteristics,
        &["/characteristics"],
        Transform::Characteristics,
    ),
    rule(Field::Price, &["/price"], Transform::ScrapedPrice),
    rule(Field::Rating, &["/rating"], Transform::Rating),
];

/// The field map for payloads from `source`.
#[must_use]
pub fn field_map(source: SourceKind) -> &'static [FieldRule] {
    match source {
        SourceKind::StorageCard => STORAGE_CARD_FIELDS,
        SourceKind::Aggregator | SourceKind::Search => CATALOG_FIELDS,
        SourceKind::RenderedPage => PAGE_FIELDS,
        SourceKind::None => &[],
    }
}
