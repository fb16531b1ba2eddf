//! Bundled default datasets.
//!
//! # Responsibility
//! - Provide the records used to initialize empty local storage.
//! - Provide the records used to repair corrupted local storage.
//!
//! # Invariants
//! - Seeds are always strictly validated before being handed out.

use crate::error::{DataError, DataResult};
use crate::model::content::WebContent;
use crate::model::rate::RateItem;
use crate::schema::{validate_sequence, Schema};
use serde_json::Value;

const RATES_SEED_JSON: &str = include_str!("rates.json");
const CONTENT_SEED_JSON: &str = include_str!("content.json");

/// Default price list.
pub fn seed_rates() -> DataResult<Vec<RateItem>> {
    load_seed(RATES_SEED_JSON, "rates")
}

/// Default page-content blocks.
pub fn seed_content() -> DataResult<Vec<WebContent>> {
    load_seed(CONTENT_SEED_JSON, "content")
}

pub(crate) fn load_seed<T: Schema>(raw: &str, name: &'static str) -> DataResult<Vec<T>> {
    let value: Value = serde_json::from_str(raw).map_err(|err| DataError::Corruption {
        slot: name.to_string(),
        message: err.to_string(),
    })?;
    validate_sequence(&value).map_err(DataError::Validation)
}
