//! Error taxonomy surfaced by the data layer.
//!
//! # Invariants
//! - Storage and service errors are wrapped, never swallowed or retried.
//! - Corruption is only surfaced when the bundled seed itself is unreadable;
//!   corrupted local slots are repaired inside the local backend.

use crate::backend::table::ServiceError;
use crate::config::ConfigError;
use crate::schema::ValidationFailure;
use crate::storage::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type DataResult<T> = Result<T, DataError>;

/// Error returned by every data-layer operation.
#[derive(Debug)]
pub enum DataError {
    /// Record or payload does not conform to its schema.
    Validation(ValidationFailure),
    /// Structured payload could not be parsed.
    Corruption { slot: String, message: String },
    /// Local medium rejected a read or write.
    Storage(StorageError),
    /// Remote service reported an error.
    Service(ServiceError),
    /// Backend could not be resolved from configuration.
    Config(ConfigError),
}

impl Display for DataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "validation failed: {err}"),
            Self::Corruption { slot, message } => {
                write!(f, "corrupted payload in `{slot}`: {message}")
            }
            Self::Storage(err) => write!(f, "{err}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Corruption { .. } => None,
            Self::Storage(err) => Some(err),
            Self::Service(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<ValidationFailure> for DataError {
    fn from(value: ValidationFailure) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for DataError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<ServiceError> for DataError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<ConfigError> for DataError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}
