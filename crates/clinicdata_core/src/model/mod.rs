//! Record types shared by every backend.
//!
//! # Responsibility
//! - Define the canonical price-list and page-content records.
//! - Define write payloads (`NewRate`, `RatePatch`).
//!
//! # Invariants
//! - Every record is identified by an opaque, immutable `RecordId`.
//! - Serialized shape matches the persisted slot layout and remote rows.

pub mod content;
pub mod rate;

/// Opaque identifier for a persisted record.
///
/// Local mode mints UUID v4 strings; remote rows carry whatever the service
/// assigned, so the type stays textual.
pub type RecordId = String;
