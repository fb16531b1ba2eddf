//! Editable page-content block model.

use super::RecordId;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Actor marker written to `updated_by` by the on-device backend.
pub const LOCAL_ACTOR: &str = "local";

/// Structured payload rendered into one page section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Body text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_link: Option<String>,
}

/// Content block bound to a named page section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebContent {
    pub id: RecordId,
    /// Placement key, e.g. `hero`. Unique by convention only.
    pub section: String,
    pub content: SectionContent,
    pub updated_by: Option<String>,
    /// RFC 3339 timestamp of the last create/update.
    pub updated_at: String,
}

/// Current time in the wire format used for `updated_at`.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::{timestamp_now, SectionContent};

    #[test]
    fn timestamp_is_utc_millis() {
        let stamp = timestamp_now();
        assert!(stamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());
    }

    #[test]
    fn empty_section_content_serializes_to_empty_object() {
        let json = serde_json::to_value(SectionContent::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }
}
