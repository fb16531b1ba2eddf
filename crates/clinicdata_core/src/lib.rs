//! Data layer for the clinic website and its admin back-office.
//! One asynchronous contract over on-device slots or a remote tabular service.

pub mod auth;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod schema;
pub mod seed;
pub mod service;
pub mod storage;

pub use auth::{AdminGate, AuthError};
pub use backend::table::{Filter, Order, SelectQuery, ServiceError, ServiceResult, TableService};
pub use backend::{DataBackend, LocalBackend, RemoteBackend};
pub use config::{AdminConfig, AdminMode, AppConfig, ConfigError, DataConfig, DataMode};
pub use error::{DataError, DataResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::content::{SectionContent, WebContent};
pub use model::rate::{NewRate, RateItem, RatePatch};
pub use model::RecordId;
pub use schema::{validate_sequence, validate_sequence_lenient, Schema, ValidationFailure};
pub use service::data_facade::DataFacade;
pub use storage::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
