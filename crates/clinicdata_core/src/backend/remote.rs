//! Remote backend over a tabular data service.
//!
//! # Responsibility
//! - Map each data operation onto one select/insert/update/delete call.
//!
//! # Invariants
//! - No retry, caching or recovery; service errors surface unchanged.
//! - No client-side schema validation; rows are only decoded.
//! - Listings are ordered by `category` (rates) or `section` (content).

use super::table::{Filter, Order, SelectQuery, ServiceError, TableService};
use super::DataBackend;
use crate::error::DataResult;
use crate::model::content::{timestamp_now, SectionContent, WebContent};
use crate::model::rate::{NewRate, RateItem, RatePatch};
use async_trait::async_trait;
use log::{error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

pub const RATES_TABLE: &str = "rate_list";
pub const CONTENT_TABLE: &str = "website_content";

/// Backend that forwards every operation to a [`TableService`].
pub struct RemoteBackend {
    service: Arc<dyn TableService>,
}

#[derive(Serialize)]
struct ContentRow<'a> {
    section: &'a str,
    content: &'a SectionContent,
    updated_at: String,
}

impl RemoteBackend {
    pub fn new(service: Arc<dyn TableService>) -> Self {
        Self { service }
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &'static str,
        query: SelectQuery,
    ) -> DataResult<Vec<T>> {
        let started_at = Instant::now();
        let rows = self
            .service
            .select(table, &query)
            .await
            .map_err(|err| log_failure("select", table, err))?;
        let count = rows.len();
        let records = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()
            .map_err(|err| {
                log_failure(
                    "select",
                    table,
                    ServiceError::new(format!("unexpected row shape: {err}")),
                )
            })?;
        info!(
            "event=remote_select module=remote status=ok table={table} count={count} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(records)
    }

    async fn insert(&self, table: &'static str, row: Value) -> DataResult<()> {
        self.service
            .insert(table, vec![row])
            .await
            .map_err(|err| log_failure("insert", table, err))?;
        info!("event=remote_insert module=remote status=ok table={table}");
        Ok(())
    }

    async fn update(&self, table: &'static str, id: &str, patch: Value) -> DataResult<()> {
        self.service
            .update(table, patch, &Filter::eq("id", id))
            .await
            .map_err(|err| log_failure("update", table, err))?;
        info!("event=remote_update module=remote status=ok table={table} id={id}");
        Ok(())
    }

    async fn delete(&self, table: &'static str, id: &str) -> DataResult<()> {
        self.service
            .delete(table, &Filter::eq("id", id))
            .await
            .map_err(|err| log_failure("delete", table, err))?;
        info!("event=remote_delete module=remote status=ok table={table} id={id}");
        Ok(())
    }
}

fn log_failure(operation: &str, table: &str, err: ServiceError) -> ServiceError {
    error!(
        "event=remote_{operation} module=remote status=error table={table} status_code={:?} code={:?}",
        err.status, err.code
    );
    err
}

fn to_row(value: &impl Serialize) -> DataResult<Value> {
    serde_json::to_value(value)
        .map_err(|err| ServiceError::new(format!("failed to encode payload: {err}")).into())
}

#[async_trait]
impl DataBackend for RemoteBackend {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn list_rates(&self) -> DataResult<Vec<RateItem>> {
        self.select(RATES_TABLE, SelectQuery::all().order(Order::asc("category")))
            .await
    }

    async fn fetch_active_rates(&self) -> DataResult<Vec<RateItem>> {
        let query = SelectQuery::all()
            .filter(Filter::eq("is_active", true))
            .order(Order::asc("category"));
        self.select(RATES_TABLE, query).await
    }

    async fn add_rate(&self, payload: NewRate) -> DataResult<()> {
        let row = to_row(&payload)?;
        self.insert(RATES_TABLE, row).await
    }

    async fn update_rate(&self, id: &str, patch: RatePatch) -> DataResult<()> {
        let patch = to_row(&patch)?;
        self.update(RATES_TABLE, id, patch).await
    }

    async fn delete_rate(&self, id: &str) -> DataResult<()> {
        self.delete(RATES_TABLE, id).await
    }

    async fn list_content(&self) -> DataResult<Vec<WebContent>> {
        self.select(CONTENT_TABLE, SelectQuery::all().order(Order::asc("section")))
            .await
    }

    async fn add_content(&self, section: String, content: SectionContent) -> DataResult<()> {
        let row = to_row(&ContentRow {
            section: &section,
            content: &content,
            updated_at: timestamp_now(),
        })?;
        self.insert(CONTENT_TABLE, row).await
    }

    async fn update_content(
        &self,
        id: &str,
        section: String,
        content: SectionContent,
    ) -> DataResult<()> {
        let patch = to_row(&ContentRow {
            section: &section,
            content: &content,
            updated_at: timestamp_now(),
        })?;
        self.update(CONTENT_TABLE, id, patch).await
    }

    async fn delete_content(&self, id: &str) -> DataResult<()> {
        self.delete(CONTENT_TABLE, id).await
    }
}
