//! Payload classification.
//!
//! Decoding tries, in order: JSON, then links, then falls back to text.
//! Inside JSON the `type` tag wins over id-field probing. Inside links the
//! path markers are tested in `EntityKind::ALL` order. First match wins.

use serde_json::{Map, Value};

use super::types::EntityKind;
use crate::models::enums::PayloadCategory;

/// A scan decoded into a tagged shape.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedPayload {
    /// JSON object naming a domain entity by `type` tag or id field.
    Entity {
        kind: EntityKind,
        record: Map<String, Value>,
    },
    /// Valid JSON that names no known entity.
    UnrecognizedJson(Value),
    /// Absolute http(s) URL or site-relative path.
    Link {
        kind: Option<EntityKind>,
        url: String,
    },
    Text,
}

impl DecodedPayload {
    pub fn category(&self) -> PayloadCategory {
        match self {
            Self::Entity { kind, .. } => kind.category(),
            Self::UnrecognizedJson(_) => PayloadCategory::Unknown,
            Self::Link { kind: Some(kind), .. } => kind.category(),
            Self::Link { kind: None, .. } => PayloadCategory::Url,
            Self::Text => PayloadCategory::Text,
        }
    }
}

/// Classify scanned text. Total: every input maps to one category.
pub fn classify(text: &str) -> PayloadCategory {
    let category = decode(text).category();
    tracing::debug!(category = %category, len = text.len(), "QR payload classified");
    category
}

pub fn decode(text: &str) -> DecodedPayload {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return decode_json(value);
    }
    if is_link(text) {
        return DecodedPayload::Link {
            kind: link_kind(text),
            url: text.to_string(),
        };
    }
    DecodedPayload::Text
}

fn decode_json(value: Value) -> DecodedPayload {
    let record = match value {
        Value::Object(record) => record,
        other => return DecodedPayload::UnrecognizedJson(other),
    };

    let tagged = record
        .get("type")
        .filter(|v| is_present(v))
        .map(|tag| tag.as_str().and_then(EntityKind::from_type_tag));

    if let Some(tagged) = tagged {
        return match tagged {
            Some(kind) => DecodedPayload::Entity { kind, record },
            None => DecodedPayload::UnrecognizedJson(Value::Object(record)),
        };
    }

    let probed = EntityKind::ALL
        .into_iter()
        .find(|kind| record.get(kind.id_field()).is_some_and(is_present));

    match probed {
        Some(kind) => DecodedPayload::Entity { kind, record },
        None => DecodedPayload::UnrecognizedJson(Value::Object(record)),
    }
}

/// A JSON field counts when it is neither null nor an empty string.
pub(crate) fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// `http://`, `https://`, or a single-slash site-relative path.
pub(crate) fn is_link(text: &str) -> bool {
    text.starts_with("http://")
        || text.starts_with("https://")
        || (text.starts_with('/') && !text.starts_with("//"))
}

fn link_kind(url: &str) -> Option<EntityKind> {
    EntityKind::ALL
        .into_iter()
        .find(|kind| kind.path_markers().iter().any(|marker| url.contains(marker)))
}
