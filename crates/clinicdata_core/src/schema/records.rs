use super::{
    as_object, defaulted_bool, defaulted_nullable_string, non_empty_string, non_negative_number,
    optional_string, required_nullable_string, required_string, Schema, ValidationFailure,
};
use crate::model::content::{SectionContent, WebContent};
use crate::model::rate::{default_is_active, RateItem};
use serde_json::Value;

impl Schema for RateItem {
    fn validate(candidate: &Value) -> Result<Self, ValidationFailure> {
        let object = as_object(candidate, "rate")?;
        Ok(Self {
            id: required_string(object, "id")?,
            test_name: non_empty_string(object, "test_name")?,
            price: non_negative_number(object, "price")?,
            category: non_empty_string(object, "category")?,
            description: defaulted_nullable_string(object, "description")?,
            is_active: defaulted_bool(object, "is_active", default_is_active())?,
        })
    }
}

impl Schema for SectionContent {
    fn validate(candidate: &Value) -> Result<Self, ValidationFailure> {
        let object = as_object(candidate, "content")?;
        Ok(Self {
            title: optional_string(object, "title")?,
            content: optional_string(object, "content")?,
            image_url: optional_string(object, "image_url")?,
            button_text: optional_string(object, "button_text")?,
            button_link: optional_string(object, "button_link")?,
        })
    }
}

impl Schema for WebContent {
    fn validate(candidate: &Value) -> Result<Self, ValidationFailure> {
        let object = as_object(candidate, "web_content")?;
        let content = object
            .get("content")
            .ok_or(ValidationFailure::MissingField("content"))?;
        Ok(Self {
            id: required_string(object, "id")?,
            section: non_empty_string(object, "section")?,
            content: SectionContent::validate(content)?,
            updated_by: required_nullable_string(object, "updated_by")?,
            updated_at: required_string(object, "updated_at")?,
        })
    }
}
