//! Structural schema validation for persisted records.
//!
//! # Responsibility
//! - Turn untyped JSON candidates into fully-typed records with defaults.
//! - Validate sequences strictly or leniently (element-wise partition).
//!
//! # Invariants
//! - Unknown extra fields are ignored; missing required fields fail.
//! - Validation is pure: no I/O, no logging.

mod records;

use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reason a candidate value does not conform to a record schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    /// Candidate (or a nested field) is not a JSON object.
    NotAnObject(&'static str),
    /// Sequence candidate is not a JSON array.
    NotASequence,
    MissingField(&'static str),
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    EmptyString(&'static str),
    NegativeNumber(&'static str),
    /// Sequence element at `index` failed.
    Element {
        index: usize,
        failure: Box<ValidationFailure>,
    },
}

impl Display for ValidationFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject(field) => write!(f, "`{field}` must be an object"),
            Self::NotASequence => write!(f, "expected a sequence of records"),
            Self::MissingField(field) => write!(f, "missing required field `{field}`"),
            Self::WrongType { field, expected } => {
                write!(f, "field `{field}` must be {expected}")
            }
            Self::EmptyString(field) => write!(f, "field `{field}` must not be empty"),
            Self::NegativeNumber(field) => write!(f, "field `{field}` must not be negative"),
            Self::Element { index, failure } => write!(f, "record #{index}: {failure}"),
        }
    }
}

impl Error for ValidationFailure {}

/// Record types with a structural schema.
pub trait Schema: Sized {
    /// Validates one candidate, applying declared defaults.
    fn validate(candidate: &Value) -> Result<Self, ValidationFailure>;
}

/// Result of element-wise sequence validation.
#[derive(Debug, Clone, PartialEq)]
pub struct LenientOutcome<T> {
    /// Elements that validated, in original order.
    pub records: Vec<T>,
    /// Index and reason for every discarded element.
    pub rejected: Vec<(usize, ValidationFailure)>,
}

/// Validates a whole sequence; the first failing element fails the sequence.
pub fn validate_sequence<T: Schema>(candidate: &Value) -> Result<Vec<T>, ValidationFailure> {
    let items = candidate.as_array().ok_or(ValidationFailure::NotASequence)?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            T::validate(item).map_err(|failure| ValidationFailure::Element {
                index,
                failure: Box::new(failure),
            })
        })
        .collect()
}

/// Validates every element independently and partitions the results.
///
/// A candidate that is not a sequence yields zero records.
pub fn validate_sequence_lenient<T: Schema>(candidate: &Value) -> LenientOutcome<T> {
    let mut outcome = LenientOutcome {
        records: Vec::new(),
        rejected: Vec::new(),
    };
    let Some(items) = candidate.as_array() else {
        return outcome;
    };
    for (index, item) in items.iter().enumerate() {
        match T::validate(item) {
            Ok(record) => outcome.records.push(record),
            Err(failure) => outcome.rejected.push((index, failure)),
        }
    }
    outcome
}

fn as_object<'a>(
    value: &'a Value,
    field: &'static str,
) -> Result<&'a Map<String, Value>, ValidationFailure> {
    value
        .as_object()
        .ok_or(ValidationFailure::NotAnObject(field))
}

fn required_string(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<String, ValidationFailure> {
    match object.get(field) {
        None => Err(ValidationFailure::MissingField(field)),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(ValidationFailure::WrongType {
            field,
            expected: "a string",
        }),
    }
}

fn non_empty_string(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<String, ValidationFailure> {
    let text = required_string(object, field)?;
    if text.is_empty() {
        return Err(ValidationFailure::EmptyString(field));
    }
    Ok(text)
}

/// Absent or `null` map to `None`.
fn defaulted_nullable_string(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ValidationFailure> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(ValidationFailure::WrongType {
            field,
            expected: "a string or null",
        }),
    }
}

/// Key must be present; `null` allowed.
fn required_nullable_string(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ValidationFailure> {
    match object.get(field) {
        None => Err(ValidationFailure::MissingField(field)),
        Some(_) => defaulted_nullable_string(object, field),
    }
}

/// Absent maps to `None`; `null` is rejected.
fn optional_string(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ValidationFailure> {
    match object.get(field) {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(ValidationFailure::WrongType {
            field,
            expected: "a string",
        }),
    }
}

fn non_negative_number(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<f64, ValidationFailure> {
    let number = match object.get(field) {
        None => return Err(ValidationFailure::MissingField(field)),
        Some(value) => value.as_f64().ok_or(ValidationFailure::WrongType {
            field,
            expected: "a number",
        })?,
    };
    if number < 0.0 {
        return Err(ValidationFailure::NegativeNumber(field));
    }
    Ok(number)
}

fn defaulted_bool(
    object: &Map<String, Value>,
    field: &'static str,
    default: bool,
) -> Result<bool, ValidationFailure> {
    match object.get(field) {
        None => Ok(default),
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(_) => Err(ValidationFailure::WrongType {
            field,
            expected: "a boolean",
        }),
    }
}
