//! Price-list record model.
//!
//! # Invariants
//! - `test_name` and `category` are non-empty.
//! - `price` is a non-negative number.
//! - `is_active` controls public visibility and defaults to `true`.

use super::RecordId;
use serde::{Deserialize, Deserializer, Serialize};

/// One priced diagnostic test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateItem {
    pub id: RecordId,
    pub test_name: String,
    pub price: f64,
    /// Grouping key; compared case-insensitively by consumers.
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

pub(crate) fn default_is_active() -> bool {
    true
}

impl RateItem {
    /// Builds a record from a creation payload and a freshly minted id.
    pub fn from_new(id: RecordId, payload: &NewRate) -> Self {
        Self {
            id,
            test_name: payload.test_name.clone(),
            price: payload.price,
            category: payload.category.clone(),
            description: payload.description.clone(),
            is_active: payload.is_active,
        }
    }

    /// Merges the supplied patch fields; absent fields stay untouched.
    pub fn apply_patch(&mut self, patch: &RatePatch) {
        if let Some(test_name) = &patch.test_name {
            self.test_name = test_name.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
    }
}

/// Creation payload for a price-list entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRate {
    pub test_name: String,
    pub price: f64,
    pub category: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl NewRate {
    /// Creates an active entry without description.
    pub fn new(test_name: impl Into<String>, price: f64, category: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            price,
            category: category.into(),
            description: None,
            is_active: true,
        }
    }
}

/// Partial update for a price-list entry.
///
/// Only `Some` fields are merged locally or sent to the remote service.
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl RatePatch {
    pub fn is_empty(&self) -> bool {
        self.test_name.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.is_active.is_none()
    }
}

/// A present key, `null` included, decodes to `Some`; an absent key falls
/// back to `default`.
fn present_field<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
