//! Backend contract shared by local and remote modes.
//!
//! # Responsibility
//! - Define the operation set every consumer sees (`DataBackend`).
//! - Host the two implementations: on-device slots and remote tables.
//!
//! # Invariants
//! - Both implementations expose identical signatures and ordering rules
//!   documented per backend.
//! - Storage and service errors propagate unchanged.

pub mod local;
pub mod remote;
pub mod rest;
pub mod table;

use crate::error::DataResult;
use crate::model::content::{SectionContent, WebContent};
use crate::model::rate::{NewRate, RateItem, RatePatch};
use async_trait::async_trait;

pub use local::LocalBackend;
pub use remote::RemoteBackend;

/// Data operations for price-list entries and page-content blocks.
///
/// The local implementation does its SQLite or in-memory I/O inline on the
/// calling task, without `spawn_blocking`. Each call touches one small slot,
/// so a caller serving many concurrent requests should run it on a blocking
/// pool itself.
#[async_trait]
pub trait DataBackend: Send + Sync {
    /// Short backend name for diagnostics (`local` or `remote`).
    fn name(&self) -> &'static str;

    /// Every price-list entry, including inactive ones.
    async fn list_rates(&self) -> DataResult<Vec<RateItem>>;
    /// Only entries with `is_active == true`.
    async fn fetch_active_rates(&self) -> DataResult<Vec<RateItem>>;
    async fn add_rate(&self, payload: NewRate) -> DataResult<()>;
    /// Merges `patch` into the entry with `id`. Unknown ids are a no-op.
    async fn update_rate(&self, id: &str, patch: RatePatch) -> DataResult<()>;
    async fn delete_rate(&self, id: &str) -> DataResult<()>;

    async fn list_content(&self) -> DataResult<Vec<WebContent>>;
    async fn add_content(&self, section: String, content: SectionContent) -> DataResult<()>;
    /// Replaces `section` and `content` wholesale on the block with `id`.
    async fn update_content(
        &self,
        id: &str,
        section: String,
        content: SectionContent,
    ) -> DataResult<()>;
    async fn delete_content(&self, id: &str) -> DataResult<()>;
}
