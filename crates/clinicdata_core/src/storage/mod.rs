//! Persistent key-value medium used by local mode.
//!
//! # Responsibility
//! - Define the slot contract (`get`/`set`/`remove` of text values).
//! - Provide SQLite-backed and in-process implementations.
//!
//! # Invariants
//! - Implementations never interpret slot values.
//! - Errors are reported, never retried or swallowed.

mod memory;
mod sqlite_kv;

pub use memory::MemoryKeyValueStore;
pub use sqlite_kv::SqliteKeyValueStore;

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot holding the serialized price list.
pub const RATES_KEY: &str = "md_rate_list";
/// Slot holding the serialized page-content blocks.
pub const CONTENT_KEY: &str = "md_website_content";
/// Slot holding the local admin sign-in flag.
pub const ADMIN_FLAG_KEY: &str = "local_admin";

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure reported by the key-value medium.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Write rejected because it would exceed the medium's capacity.
    QuotaExceeded {
        key: String,
        required_bytes: usize,
        quota_bytes: usize,
    },
    /// Medium refused access (poisoned lock, read-only medium, ...).
    AccessDenied(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "storage error: {err}"),
            Self::QuotaExceeded {
                key,
                required_bytes,
                quota_bytes,
            } => write!(
                f,
                "storage quota exceeded writing `{key}`: {required_bytes} bytes needed, quota is {quota_bytes}"
            ),
            Self::AccessDenied(message) => write!(f, "storage access denied: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::QuotaExceeded { .. } | Self::AccessDenied(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Text slots addressed by fixed keys.
pub trait KeyValueStore: Send + Sync {
    /// Returns the slot value, or `None` when the slot was never written.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Replaces the slot value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    /// Clears the slot. Clearing an absent slot is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}
