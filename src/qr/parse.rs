use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::decode::is_present;
use super::types::{EntityKind, ParsedPayload};
use super::ScanError;
use crate::models::enums::PayloadCategory;

static BATCH_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/batch(?:-tracking)?/([^/?#]+)").unwrap());
static PRODUCT_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(?:product|marketplace)/([^/?#]+)").unwrap());
static CENTER_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/recycling-centers?/([^/?#]+)").unwrap());
static PROFILE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/profile/([^/?#]+)").unwrap());

fn path_regex(kind: EntityKind) -> &'static Regex {
    match kind {
        EntityKind::Batch => &BATCH_PATH,
        EntityKind::Product => &PRODUCT_PATH,
        EntityKind::RecyclingCenter => &CENTER_PATH,
        EntityKind::Profile => &PROFILE_PATH,
    }
}

/// Extract identifier, target URL, and raw data for an already
/// classified scan.
///
/// Domain categories re-read the text as JSON first and fall back to the
/// category's URL path pattern. Fails only on an id field that holds
/// something other than a string or number.
pub fn parse(text: &str, category: PayloadCategory) -> Result<ParsedPayload, ScanError> {
    let mut parsed = ParsedPayload::new(category);

    match category.entity_kind() {
        Some(kind) => match serde_json::from_str::<Value>(text) {
            Ok(value) => {
                parsed.identifier = identifier_from_json(kind, &value)?;
                parsed.raw_data = Some(value);
            }
            Err(_) => {
                parsed.identifier = identifier_from_url(kind, text);
                parsed.target_url = Some(text.to_string());
            }
        },
        None if category == PayloadCategory::Url => {
            parsed.target_url = Some(text.to_string());
        }
        None => {
            parsed.raw_data = Some(Value::String(text.to_string()));
        }
    }

    Ok(parsed)
}

/// The domain id field, else the generic `id`.
fn identifier_from_json(kind: EntityKind, value: &Value) -> Result<Option<String>, ScanError> {
    let Value::Object(record) = value else {
        return Ok(None);
    };

    let field = [kind.id_field(), "id"]
        .into_iter()
        .find(|field| record.get(*field).is_some_and(is_present));

    let Some(field) = field else {
        return Ok(None);
    };

    match &record[field] {
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(ScanError::MalformedIdentifier {
            field: field.to_string(),
            found: json_type_name(other),
        }),
    }
}

/// First path segment after the kind's marker, percent-decoded.
fn identifier_from_url(kind: EntityKind, url: &str) -> Option<String> {
    let segment = path_regex(kind).captures(url)?.get(1)?.as_str();
    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    Some(decoded)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
