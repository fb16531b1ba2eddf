//! PostgREST-compatible HTTP client implementing [`TableService`].
//!
//! # Responsibility
//! - Translate table calls into REST requests under `{base}/rest/v1/{table}`.
//! - Decode non-2xx bodies into [`ServiceError`] without altering them.
//!
//! # Invariants
//! - Every request carries the `apikey` header and a bearer token.
//! - Write requests ask for `return=minimal`; no body is expected back.

use super::table::{Filter, Order, SelectQuery, ServiceError, ServiceResult, TableService};
use crate::config::RemoteConfig;
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const REST_PATH: &str = "rest/v1";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

pub struct RestTableService {
    base_url: String,
    api_key: String,
    client: Client,
}

impl RestTableService {
    /// Builds a client for `config.base_url`.
    ///
    /// # Errors
    /// Returns an error when the base URL is blank or the HTTP client cannot
    /// be initialized.
    pub fn new(config: &RemoteConfig) -> ServiceResult<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ServiceError::new("remote base url must not be empty"));
        }

        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ServiceError::new(format!("failed to build http client: {err}")))?;

        Ok(Self {
            base_url,
            api_key: config.api_key.clone(),
            client,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{REST_PATH}/{table}", self.base_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn write(&self, request: RequestBuilder) -> RequestBuilder {
        self.authorized(request).header("Prefer", "return=minimal")
    }
}

#[async_trait]
impl TableService for RestTableService {
    async fn select(&self, table: &str, query: &SelectQuery) -> ServiceResult<Vec<Value>> {
        let params = select_params(query);
        debug!("event=rest_request module=rest method=GET table={table} params={params:?}");
        let request = self
            .authorized(self.client.get(self.table_url(table)))
            .query(&params);
        let response = checked(request).await?;
        response
            .json::<Vec<Value>>()
            .await
            .map_err(|err| ServiceError::new(format!("failed to decode rows: {err}")))
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> ServiceResult<()> {
        debug!("event=rest_request module=rest method=POST table={table} rows={}", rows.len());
        let request = self
            .write(self.client.post(self.table_url(table)))
            .json(&rows);
        checked(request).await.map(|_| ())
    }

    async fn update(&self, table: &str, patch: Value, filter: &Filter) -> ServiceResult<()> {
        debug!("event=rest_request module=rest method=PATCH table={table}");
        let request = self
            .write(self.client.patch(self.table_url(table)))
            .query(&[filter_param(filter)])
            .json(&patch);
        checked(request).await.map(|_| ())
    }

    async fn delete(&self, table: &str, filter: &Filter) -> ServiceResult<()> {
        debug!("event=rest_request module=rest method=DELETE table={table}");
        let request = self
            .write(self.client.delete(self.table_url(table)))
            .query(&[filter_param(filter)]);
        checked(request).await.map(|_| ())
    }
}

/// Sends `request` and turns non-2xx responses into [`ServiceError`].
async fn checked(request: RequestBuilder) -> ServiceResult<Response> {
    let response = request.send().await.map_err(|err| ServiceError {
        status: err.status().map(|status| status.as_u16()),
        message: format!("request failed: {err}"),
        ..ServiceError::default()
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(error_from_body(status.as_u16(), &body))
}

fn select_params(query: &SelectQuery) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    params.extend(query.filters.iter().map(filter_param));
    if let Some(order) = query.order {
        params.push(order_param(order));
    }
    params
}

fn filter_param(filter: &Filter) -> (String, String) {
    let value = match &filter.value {
        Value::String(text) => text.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    };
    (filter.column.to_string(), format!("eq.{value}"))
}

fn order_param(order: Order) -> (String, String) {
    let direction = if order.ascending { "asc" } else { "desc" };
    ("order".to_string(), format!("{}.{direction}", order.column))
}

fn error_from_body(status: u16, body: &str) -> ServiceError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => ServiceError {
            status: Some(status),
            code: parsed.code,
            message: parsed.message.unwrap_or_else(|| body.to_string()),
            details: parsed.details,
            hint: parsed.hint,
        },
        Err(_) => ServiceError {
            status: Some(status),
            message: body.to_string(),
            ..ServiceError::default()
        },
    }
}
