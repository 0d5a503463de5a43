use super::types::{DispatchResult, DisplayData, EntityKind, Notification, ParsedPayload};
use crate::config::ScannerConfig;
use crate::models::enums::PayloadCategory;

/// Navigation decision plus the single notification describing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub dispatch: DispatchResult,
    pub notification: Notification,
}

/// Decide what the app does with a parsed scan.
///
/// Domain links are followed as scanned. Plain `Url` scans are the only
/// ones checked against the internal/external boundary.
pub fn resolve(parsed: &ParsedPayload, config: &ScannerConfig) -> Resolution {
    match parsed.category.entity_kind() {
        Some(kind) => resolve_entity(kind, parsed),
        None => match parsed.category {
            PayloadCategory::Url => resolve_link(parsed, config),
            PayloadCategory::Unknown => Resolution {
                dispatch: DispatchResult::display(DisplayData::Text(raw_text(parsed))),
                notification: Notification::normal(
                    "Unrecognized QR Code",
                    "This QR code format is not recognized.",
                ),
            },
            _ => Resolution {
                dispatch: DispatchResult::display(DisplayData::Text(raw_text(parsed))),
                notification: Notification::normal(
                    "Text QR Code",
                    "This QR code contains plain text.",
                ),
            },
        },
    }
}

fn resolve_entity(kind: EntityKind, parsed: &ParsedPayload) -> Resolution {
    let title = format!("{} QR Code Detected", kind.label());

    if let Some(target) = parsed.target_url.as_deref() {
        return Resolution {
            dispatch: DispatchResult::navigate(target),
            notification: Notification::normal(title, format!("Opening {target}")),
        };
    }

    if let Some(id) = parsed.identifier.as_deref() {
        let route = format!("{}{}", kind.route_prefix(), urlencoding::encode(id));
        return Resolution {
            notification: Notification::normal(
                title,
                format!("Opening {} {id}", kind.label().to_lowercase()),
            ),
            dispatch: DispatchResult::navigate(route),
        };
    }

    tracing::warn!(kind = ?kind, "Domain QR code carries no identifier");
    Resolution {
        dispatch: DispatchResult::display(DisplayData::Payload(parsed.clone())),
        notification: Notification::destructive(
            format!("{} Not Found", kind.label()),
            format!(
                "This QR code refers to a {} but does not say which one.",
                kind.label().to_lowercase()
            ),
        ),
    }
}

fn resolve_link(parsed: &ParsedPayload, config: &ScannerConfig) -> Resolution {
    let url = parsed.target_url.as_deref().unwrap_or_default();

    if config.is_internal_url(url) {
        return Resolution {
            dispatch: DispatchResult::navigate(url),
            notification: Notification::normal("Link QR Code Detected", format!("Opening {url}")),
        };
    }

    tracing::warn!(url = %url, "Refusing to open external link from QR code");
    Resolution {
        dispatch: DispatchResult::display(DisplayData::Payload(parsed.clone())),
        notification: Notification::caution(
            "External Link",
            format!("This QR code points outside RePlas ({url}). It was not opened automatically."),
        ),
    }
}

fn raw_text(parsed: &ParsedPayload) -> String {
    match &parsed.raw_data {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
