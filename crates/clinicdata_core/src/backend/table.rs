//! Contract for the remote tabular data service.
//!
//! # Responsibility
//! - Describe the minimal select/insert/update/delete surface remote mode needs.
//! - Carry service-reported errors without reinterpretation.
//!
//! # Invariants
//! - Filters are equality-only; ordering is a single column.

use async_trait::async_trait;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error reported by (or while talking to) the remote service.
///
/// Fields mirror the service's own error body so callers see it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceError {
    /// HTTP status, when a response was received.
    pub status: Option<u16>,
    /// Service error code (e.g. a SQLSTATE such as `23502`).
    pub code: Option<String>,
    pub message: String,
    pub details: Option<String>,
    pub hint: Option<String>,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "remote service error")?;
        if let Some(status) = self.status {
            write!(f, " (status {status})")?;
        }
        if let Some(code) = &self.code {
            write!(f, " [{code}]")?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(details) = &self.details {
            write!(f, "; details: {details}")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, "; hint: {hint}")?;
        }
        Ok(())
    }
}

impl Error for ServiceError {}

/// Equality filter `column = value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: &'static str,
    pub value: Value,
}

impl Filter {
    pub fn eq(column: &'static str, value: impl Into<Value>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub column: &'static str,
    pub ascending: bool,
}

impl Order {
    pub fn asc(column: &'static str) -> Self {
        Self {
            column,
            ascending: true,
        }
    }
}

/// Row selection: all columns, filtered and ordered.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectQuery {
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
}

impl SelectQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }
}

/// Remote tables addressed by name.
#[async_trait]
pub trait TableService: Send + Sync {
    async fn select(&self, table: &str, query: &SelectQuery) -> ServiceResult<Vec<Value>>;
    async fn insert(&self, table: &str, rows: Vec<Value>) -> ServiceResult<()>;
    /// Applies `patch` to every row matching `filter`.
    async fn update(&self, table: &str, patch: Value, filter: &Filter) -> ServiceResult<()>;
    /// Deletes every row matching `filter`.
    async fn delete(&self, table: &str, filter: &Filter) -> ServiceResult<()>;
}
