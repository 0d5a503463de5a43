use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::enums::{PayloadCategory, Severity};

/// The four domain objects a QR code can point at.
///
/// `ALL` is the priority order used when probing id fields and URL paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Batch,
    Product,
    RecyclingCenter,
    Profile,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Batch,
        EntityKind::Product,
        EntityKind::RecyclingCenter,
        EntityKind::Profile,
    ];

    /// Value of the JSON `type` tag.
    pub fn type_tag(self) -> &'static str {
        match self {
            Self::Batch => "batch",
            Self::Product => "product",
            Self::RecyclingCenter => "recycling-center",
            Self::Profile => "profile",
        }
    }

    /// Domain-specific JSON id field.
    pub fn id_field(self) -> &'static str {
        match self {
            Self::Batch => "batchId",
            Self::Product => "productId",
            Self::RecyclingCenter => "centerId",
            Self::Profile => "profileId",
        }
    }

    /// URL path segments that mark a link as pointing at this kind.
    pub fn path_markers(self) -> &'static [&'static str] {
        match self {
            Self::Batch => &["/batch/", "/batch-tracking/"],
            Self::Product => &["/product/", "/marketplace/"],
            Self::RecyclingCenter => &["/recycling-center/", "/recycling-centers/"],
            Self::Profile => &["/profile/"],
        }
    }

    /// In-app route the identifier is appended to.
    pub fn route_prefix(self) -> &'static str {
        match self {
            Self::Batch => "/batch-tracking/",
            Self::Product => "/marketplace/",
            Self::RecyclingCenter => "/recycling-centers/",
            Self::Profile => "/profile/",
        }
    }

    /// Human-readable name used in notifications.
    pub fn label(self) -> &'static str {
        match self {
            Self::Batch => "Batch",
            Self::Product => "Product",
            Self::RecyclingCenter => "Recycling Center",
            Self::Profile => "Profile",
        }
    }

    pub fn category(self) -> PayloadCategory {
        match self {
            Self::Batch => PayloadCategory::Batch,
            Self::Product => PayloadCategory::Product,
            Self::RecyclingCenter => PayloadCategory::RecyclingCenter,
            Self::Profile => PayloadCategory::Profile,
        }
    }

    pub fn from_type_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_tag() == tag)
    }
}

impl PayloadCategory {
    /// The domain kind behind this category, `None` for url/text/unknown.
    pub fn entity_kind(&self) -> Option<EntityKind> {
        match self {
            Self::Batch => Some(EntityKind::Batch),
            Self::Product => Some(EntityKind::Product),
            Self::RecyclingCenter => Some(EntityKind::RecyclingCenter),
            Self::Profile => Some(EntityKind::Profile),
            Self::Url | Self::Text | Self::Unknown => None,
        }
    }
}

/// What a scan was understood to contain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedPayload {
    pub category: PayloadCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    /// Literal text for text/unknown scans, the decoded object for JSON scans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<Value>,
}

impl ParsedPayload {
    pub fn new(category: PayloadCategory) -> Self {
        Self {
            category,
            identifier: None,
            target_url: None,
            raw_data: None,
        }
    }
}

/// Something to show the user instead of navigating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisplayData {
    Text(String),
    Payload(ParsedPayload),
}

/// Where the app goes after a scan. Built only through `navigate` or
/// `display`, so exactly one side is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    navigate_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_data: Option<DisplayData>,
}

impl DispatchResult {
    pub fn navigate(to: impl Into<String>) -> Self {
        Self {
            navigate_to: Some(to.into()),
            display_data: None,
        }
    }

    pub fn display(data: DisplayData) -> Self {
        Self {
            navigate_to: None,
            display_data: Some(data),
        }
    }

    pub fn navigate_to(&self) -> Option<&str> {
        self.navigate_to.as_deref()
    }

    pub fn display_data(&self) -> Option<&DisplayData> {
        self.display_data.as_ref()
    }
}

/// A toast for the notification sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn normal(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_severity(Severity::Normal, title, description)
    }

    pub fn caution(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_severity(Severity::Caution, title, description)
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_severity(Severity::Destructive, title, description)
    }

    fn with_severity(
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
        }
    }
}

/// Everything one scan produced. The caller routes `dispatch` and hands
/// `notifications` to its toast sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanOutcome {
    pub category: PayloadCategory,
    pub parsed: ParsedPayload,
    pub dispatch: DispatchResult,
    pub notifications: Vec<Notification>,
}
