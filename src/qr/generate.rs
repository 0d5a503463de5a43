//! QR payload generation.
//!
//! Builds the JSON payloads the scanner recognizes and renders them (or a
//! deep link) as SVG QR codes for printing on batch bags, product labels,
//! and recycling-center signage.

use serde_json::{Map, Value};
use thiserror::Error;

use super::types::EntityKind;

#[derive(Error, Debug)]
pub enum QrRenderError {
    #[error("QR generation failed: {0}")]
    Encode(String),
}

/// Content of a printable RePlas QR code.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanPayload {
    kind: EntityKind,
    id: String,
    extra: Map<String, Value>,
}

impl ScanPayload {
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            extra: Map::new(),
        }
    }

    /// Batch payload with a freshly generated id.
    pub fn new_batch() -> Self {
        Self::new(EntityKind::Batch, new_batch_id())
    }

    /// Attach an extra display field. `type` and the id field are reserved.
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        if key != "type" && key != self.kind.id_field() {
            self.extra.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// `{"type": <tag>, <idField>: <id>, ...extra}`
    pub fn to_json(&self) -> String {
        let mut record = self.extra.clone();
        record.insert("type".into(), Value::from(self.kind.type_tag()));
        record.insert(self.kind.id_field().into(), Value::from(self.id.as_str()));
        Value::Object(record).to_string()
    }

    /// `<base><route prefix><id>`, e.g. `https://replas.app/batch-tracking/B-1`.
    pub fn deep_link(&self, base_url: &str) -> String {
        format!(
            "{}{}{}",
            base_url.trim_end_matches('/'),
            self.kind.route_prefix(),
            urlencoding::encode(&self.id)
        )
    }

    /// Render the JSON payload as an SVG QR code.
    pub fn render_svg(&self) -> Result<String, QrRenderError> {
        generate_qr_svg(&self.to_json())
    }
}

/// New batch id: `BATCH-` plus 12 uppercase hex digits.
pub fn new_batch_id() -> String {
    let simple = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
    format!("BATCH-{}", &simple[..12])
}

/// Generate a QR code as an SVG string.
pub fn generate_qr_svg(content: &str) -> Result<String, QrRenderError> {
    use qrcode::render::svg;
    use qrcode::QrCode;

    let code = QrCode::new(content.as_bytes())
        .map_err(|e| QrRenderError::Encode(e.to_string()))?;

    let svg_string = code
        .render::<svg::Color>()
        .min_dimensions(200, 200)
        .max_dimensions(300, 300)
        .dark_color(svg::Color("#14532d"))
        .light_color(svg::Color("#ffffff"))
        .quiet_zone(true)
        .build();

    Ok(svg_string)
}
