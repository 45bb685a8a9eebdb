//! Maps a [`RawPayload`] onto the canonical [`ProductRecord`] by walking the
//! source's [`field_map`].

use cardprobe_core::{Characteristic, ProductId, ProductRecord, MAX_CHARACTERISTICS};
use serde_json::Value;

use crate::field_map::{field_map, Field, FieldRule, Transform};
use crate::parse::{collapse_whitespace, parse_price_text, within_price_bounds};
use crate::sources::RawPayload;

/// Builds the record for `id` from one adapter payload.
///
/// Pure and deterministic: the same payload always yields an identical
/// record. Fields the payload lacks stay empty; an empty name becomes the
/// placeholder, which the strategy chain treats as non-informative.
#[must_use]
pub fn normalize(payload: &RawPayload, id: &ProductId) -> ProductRecord {
    let mut record = ProductRecord {
        id: id.clone(),
        name: String::new(),
        brand: String::new(),
        category: String::new(),
        description: String::new(),
        characteristics: Vec::new(),
        price: None,
        rating: String::new(),
        source_strategy: payload.source,
        success: true,
        error: None,
    };

    for rule in field_map(payload.source) {
        apply_rule(rule, &payload.body, &mut record);
    }

    if record.name.is_empty() {
        record.name = ProductRecord::placeholder_name(id);
    }
    record
}

fn apply_rule(rule: &FieldRule, body: &Value, record: &mut ProductRecord) {
    let mut candidates = rule.pointers.iter().filter_map(|p| body.pointer(p));
    match rule.transform {
        Transform::Text => {
            if let Some(text) = candidates.find_map(text_value) {
                set_text(record, rule.field, text);
            }
        }
        Transform::Rating => {
            if let Some(text) = candidates.find_map(rating_value) {
                set_text(record, rule.field, text);
            }
        }
        Transform::MinorUnits => {
            if let Some(price) = candidates.find_map(minor_units_value) {
                record.price = Some(price);
            }
        }
        Transform::ScrapedPrice => {
            if let Some(price) = candidates.find_map(scraped_price_value) {
                record.price = Some(price);
            }
        }
        Transform::Characteristics => {
            if let Some(items) = candidates.find_map(characteristics_value) {
                record.characteristics = items;
            }
        }
    }
}

fn set_text(record: &mut ProductRecord, field: Field, text: String) {
    match field {
        Field::Name => record.name = text,
        Field::Brand => record.brand = text,
        Field::Category => record.category = text,
        Field::Description => record.description = text,
        Field::Rating => record.rating = text,
        Field::Characteristics | Field::Price => {}
    }
}

fn text_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => collapse_whitespace(s),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn rating_value(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .filter(|r| *r > 0.0)
            .map(|_| n.to_string()),
        Value::String(_) => text_value(value),
        _ => None,
    }
}

fn minor_units_value(value: &Value) -> Option<u64> {
    let minor = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    (minor > 0).then_some(minor / 100)
}

fn scraped_price_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().filter(|p| within_price_bounds(*p)),
        Value::String(s) => parse_price_text(s),
        _ => None,
    }
}

/// Flattens name/value entries (and groups of them) in source order,
/// keeping at most [`MAX_CHARACTERISTICS`].
fn characteristics_value(value: &Value) -> Option<Vec<Characteristic>> {
    let mut items = Vec::new();
    collect_characteristics(value, &mut items);
    (!items.is_empty()).then_some(items)
}

fn collect_characteristics(value: &Value, items: &mut Vec<Characteristic>) {
    let Some(entries) = value.as_array() else {
        return;
    };
    for entry in entries {
        if items.len() >= MAX_CHARACTERISTICS {
            return;
        }
        if let Some(nested) = entry.get("options") {
            collect_characteristics(nested, items);
            continue;
        }
        let name = entry
            .get("name")
            .or_else(|| entry.get("key"))
            .and_then(text_value);
        let value = entry.get("value").and_then(characteristic_text);
        if let (Some(name), Some(value)) = (name, value) {
            items.push(Characteristic::new(&name, &value));
        }
    }
}

/// Scalar or list value of one characteristic; lists join with `", "`.
fn characteristic_text(value: &Value) -> Option<String> {
    match value {
        Value::Array(parts) => {
            let joined = parts
                .iter()
                .filter_map(text_value)
                .collect::<Vec<_>>()
                .join(", ");
            (!joined.is_empty()).then_some(joined)
        }
        other => text_value(other),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
