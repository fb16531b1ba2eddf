//! On-device backend over key-value slots.
//!
//! # Responsibility
//! - Persist each record type as one JSON array in a fixed slot.
//! - Repair absent, unparseable or partially invalid slots from the seed.
//!
//! # Invariants
//! - Nothing is written without passing sequence validation first; a
//!   failing sequence is reduced element-wise before it is persisted.
//! - A slot that validates as a whole is returned as stored, with no write.
//! - New records are prepended (most recent first).
//! - Storage I/O runs synchronously inside the async operations.
//! - Storage errors propagate; every mutation is a full read-modify-write
//!   and concurrent in-process writers are not serialized (last write wins).

use super::DataBackend;
use crate::error::{DataError, DataResult};
use crate::model::content::{timestamp_now, SectionContent, WebContent, LOCAL_ACTOR};
use crate::model::rate::{NewRate, RateItem, RatePatch};
use crate::schema::{validate_sequence, validate_sequence_lenient, Schema};
use crate::seed::{seed_content, seed_rates};
use crate::storage::{KeyValueStore, CONTENT_KEY, RATES_KEY};
use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// Record type stored in its own local slot.
pub trait SlotRecord: Schema + Serialize + Clone + Send + Sync {
    /// Storage key of the slot.
    const SLOT: &'static str;

    /// Validated default dataset for this slot.
    fn seed() -> DataResult<Vec<Self>>;

    fn record_id(&self) -> &str;
}

impl SlotRecord for RateItem {
    const SLOT: &'static str = RATES_KEY;

    fn seed() -> DataResult<Vec<Self>> {
        seed_rates()
    }

    fn record_id(&self) -> &str {
        &self.id
    }
}

impl SlotRecord for WebContent {
    const SLOT: &'static str = CONTENT_KEY;

    fn seed() -> DataResult<Vec<Self>> {
        seed_content()
    }

    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Outcome of checking a parsed slot value.
enum Checked<T> {
    /// Whole sequence valid; not yet written.
    Clean(Vec<T>),
    /// Recovered (cleaned or reseeded) and already persisted.
    Healed(Vec<T>),
}

/// Backend that keeps both collections in a [`KeyValueStore`].
pub struct LocalBackend {
    store: Arc<dyn KeyValueStore>,
}

impl LocalBackend {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read path: returns the slot's records, repairing the slot if needed.
    pub fn load<T: SlotRecord>(&self) -> DataResult<Vec<T>> {
        let Some(raw) = self.store.get(T::SLOT)? else {
            info!("event=slot_seed module=local status=start slot={} reason=absent", T::SLOT);
            return self.reseed();
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=slot_corrupted module=local status=recovering slot={} bytes={} error={}",
                    T::SLOT,
                    raw.len(),
                    err
                );
                return self.reseed();
            }
        };

        match self.check::<T>(&value)? {
            Checked::Clean(records) | Checked::Healed(records) => Ok(records),
        }
    }

    /// Write path: validates `records` as a sequence and persists the result.
    ///
    /// Returns what was actually written, which is shorter than `records`
    /// when some elements failed validation, or the seed when none survived.
    pub fn save<T: SlotRecord>(&self, records: &[T]) -> DataResult<Vec<T>> {
        let value = serde_json::to_value(records).map_err(|err| encode_error(T::SLOT, err))?;
        match self.check::<T>(&value)? {
            Checked::Clean(records) => {
                self.persist(&records)?;
                Ok(records)
            }
            Checked::Healed(records) => Ok(records),
        }
    }

    fn check<T: SlotRecord>(&self, value: &Value) -> DataResult<Checked<T>> {
        let failure = match validate_sequence::<T>(value) {
            Ok(records) => return Ok(Checked::Clean(records)),
            Err(failure) => failure,
        };

        let outcome = validate_sequence_lenient::<T>(value);
        let rejected: Vec<usize> = outcome.rejected.iter().map(|(index, _)| *index).collect();
        warn!(
            "event=slot_invalid module=local status=recovering slot={} kept={} rejected={:?} first_error={}",
            T::SLOT,
            outcome.records.len(),
            rejected,
            failure
        );

        if outcome.records.is_empty() {
            return self.reseed().map(Checked::Healed);
        }
        self.persist(&outcome.records)?;
        Ok(Checked::Healed(outcome.records))
    }

    fn reseed<T: SlotRecord>(&self) -> DataResult<Vec<T>> {
        let seed = T::seed()?;
        self.persist(&seed)?;
        info!(
            "event=slot_seed module=local status=ok slot={} count={}",
            T::SLOT,
            seed.len()
        );
        Ok(seed)
    }

    fn persist<T: SlotRecord>(&self, records: &[T]) -> DataResult<()> {
        let raw = serde_json::to_string(records).map_err(|err| encode_error(T::SLOT, err))?;
        self.store.set(T::SLOT, &raw)?;
        debug!(
            "event=slot_write module=local status=ok slot={} count={} bytes={}",
            T::SLOT,
            records.len(),
            raw.len()
        );
        Ok(())
    }

    /// Builds a record around a fresh id and inserts it at the front of its
    /// slot. Returns the new id.
    fn prepend<T: SlotRecord>(&self, build: impl FnOnce(String) -> T) -> DataResult<String> {
        let mut records = self.load::<T>()?;
        let existing: HashSet<&str> = records.iter().map(|record| record.record_id()).collect();
        let id = loop {
            let candidate = Uuid::new_v4().to_string();
            if !existing.contains(candidate.as_str()) {
                break candidate;
            }
        };

        let record = revalidate(&build(id.clone()))?;
        records.insert(0, record);
        self.save(&records)?;
        info!("event=record_add module=local status=ok slot={} id={id}", T::SLOT);
        Ok(id)
    }

    /// Applies `change` to the record with `id`; unknown ids are a no-op.
    fn modify<T: SlotRecord>(&self, id: &str, change: impl FnOnce(&mut T)) -> DataResult<()> {
        let mut records = self.load::<T>()?;
        let Some(position) = records.iter().position(|record| record.record_id() == id) else {
            debug!("event=record_update module=local status=noop slot={} id={id}", T::SLOT);
            return Ok(());
        };

        let mut next = records[position].clone();
        change(&mut next);
        records[position] = revalidate(&next)?;
        self.save(&records)?;
        info!("event=record_update module=local status=ok slot={} id={id}", T::SLOT);
        Ok(())
    }

    fn remove<T: SlotRecord>(&self, id: &str) -> DataResult<()> {
        let records = self.load::<T>()?;
        let before = records.len();
        let remaining: Vec<T> = records
            .into_iter()
            .filter(|record| record.record_id() != id)
            .collect();
        if remaining.len() == before {
            debug!("event=record_delete module=local status=noop slot={} id={id}", T::SLOT);
            return Ok(());
        }
        self.save(&remaining)?;
        info!("event=record_delete module=local status=ok slot={} id={id}", T::SLOT);
        Ok(())
    }
}

/// Runs a typed record back through its schema (rejects e.g. empty names,
/// negative or non-finite prices).
fn revalidate<T: SlotRecord>(record: &T) -> DataResult<T> {
    let value = serde_json::to_value(record).map_err(|err| encode_error(T::SLOT, err))?;
    Ok(T::validate(&value)?)
}

fn encode_error(slot: &str, err: serde_json::Error) -> DataError {
    DataError::Corruption {
        slot: slot.to_string(),
        message: format!("failed to encode records: {err}"),
    }
}

#[async_trait]
impl DataBackend for LocalBackend {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn list_rates(&self) -> DataResult<Vec<RateItem>> {
        self.load::<RateItem>()
    }

    async fn fetch_active_rates(&self) -> DataResult<Vec<RateItem>> {
        let rates = self.load::<RateItem>()?;
        Ok(rates.into_iter().filter(|rate| rate.is_active).collect())
    }

    async fn add_rate(&self, payload: NewRate) -> DataResult<()> {
        self.prepend(|id| RateItem::from_new(id, &payload))?;
        Ok(())
    }

    async fn update_rate(&self, id: &str, patch: RatePatch) -> DataResult<()> {
        self.modify::<RateItem>(id, |rate| rate.apply_patch(&patch))
    }

    async fn delete_rate(&self, id: &str) -> DataResult<()> {
        self.remove::<RateItem>(id)
    }

    async fn list_content(&self) -> DataResult<Vec<WebContent>> {
        self.load::<WebContent>()
    }

    async fn add_content(&self, section: String, content: SectionContent) -> DataResult<()> {
        self.prepend(|id| WebContent {
            id,
            section,
            content,
            updated_by: Some(LOCAL_ACTOR.to_string()),
            updated_at: timestamp_now(),
        })?;
        Ok(())
    }

    async fn update_content(
        &self,
        id: &str,
        section: String,
        content: SectionContent,
    ) -> DataResult<()> {
        self.modify::<WebContent>(id, |block| {
            block.section = section;
            block.content = content;
            block.updated_by = Some(LOCAL_ACTOR.to_string());
            block.updated_at = timestamp_now();
        })
    }

    async fn delete_content(&self, id: &str) -> DataResult<()> {
        self.remove::<WebContent>(id)
    }
}
