//! Mode router in front of the local and remote backends.
//!
//! # Responsibility
//! - Resolve the configured mode to a backend on first use.
//! - Forward every operation verbatim to that backend.
//!
//! # Invariants
//! - A backend, once bound, stays bound for the facade's lifetime.
//! - A failed resolution binds nothing; the next call retries it.
//! - The facade holds no record state of its own.

use crate::backend::rest::RestTableService;
use crate::backend::table::TableService;
use crate::backend::{DataBackend, LocalBackend, RemoteBackend};
use crate::config::{DataConfig, DataMode};
use crate::error::DataResult;
use crate::model::content::{SectionContent, WebContent};
use crate::model::rate::{NewRate, RateItem, RatePatch};
use crate::storage::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Single entry point for every data operation.
pub struct DataFacade {
    config: DataConfig,
    backend: OnceCell<Arc<dyn DataBackend>>,
}

impl DataFacade {
    /// Creates a facade that resolves `config.mode` on first use.
    pub fn new(config: DataConfig) -> Self {
        Self {
            config,
            backend: OnceCell::new(),
        }
    }

    /// Creates a facade bound to an already constructed backend.
    pub fn with_backend(backend: Arc<dyn DataBackend>) -> Self {
        Self {
            config: DataConfig::default(),
            backend: OnceCell::with_value(backend),
        }
    }

    /// Name of the bound backend, or `None` before first use.
    pub fn bound_backend(&self) -> Option<&'static str> {
        self.backend.get().map(|backend| backend.name())
    }

    fn backend(&self) -> DataResult<&Arc<dyn DataBackend>> {
        self.backend.get_or_try_init(|| resolve_backend(&self.config))
    }

    pub async fn list_rates(&self) -> DataResult<Vec<RateItem>> {
        self.backend()?.list_rates().await
    }

    pub async fn fetch_active_rates(&self) -> DataResult<Vec<RateItem>> {
        self.backend()?.fetch_active_rates().await
    }

    pub async fn add_rate(&self, payload: NewRate) -> DataResult<()> {
        self.backend()?.add_rate(payload).await
    }

    pub async fn update_rate(&self, id: &str, patch: RatePatch) -> DataResult<()> {
        self.backend()?.update_rate(id, patch).await
    }

    pub async fn delete_rate(&self, id: &str) -> DataResult<()> {
        self.backend()?.delete_rate(id).await
    }

    pub async fn list_content(&self) -> DataResult<Vec<WebContent>> {
        self.backend()?.list_content().await
    }

    pub async fn add_content(
        &self,
        section: impl Into<String>,
        content: SectionContent,
    ) -> DataResult<()> {
        self.backend()?.add_content(section.into(), content).await
    }

    pub async fn update_content(
        &self,
        id: &str,
        section: impl Into<String>,
        content: SectionContent,
    ) -> DataResult<()> {
        self.backend()?
            .update_content(id, section.into(), content)
            .await
    }

    pub async fn delete_content(&self, id: &str) -> DataResult<()> {
        self.backend()?.delete_content(id).await
    }
}

/// Builds the backend selected by `config.mode`.
///
/// # Errors
/// - Local mode: the database file cannot be opened or migrated.
/// - Remote mode: URL/key are missing or the HTTP client cannot be built.
pub fn resolve_backend(config: &DataConfig) -> DataResult<Arc<dyn DataBackend>> {
    let result = match config.mode {
        DataMode::Local => local_store(config)
            .map(|store| Arc::new(LocalBackend::new(store)) as Arc<dyn DataBackend>),
        DataMode::Remote => remote_service(config)
            .map(|service| Arc::new(RemoteBackend::new(service)) as Arc<dyn DataBackend>),
    };

    match &result {
        Ok(_) => info!(
            "event=backend_bind module=facade status=ok mode={} persistent={}",
            config.mode.as_str(),
            config.local_db_path.is_some()
        ),
        Err(err) => error!(
            "event=backend_bind module=facade status=error mode={} error={err}",
            config.mode.as_str()
        ),
    }
    result
}

fn local_store(config: &DataConfig) -> DataResult<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match &config.local_db_path {
        Some(path) => Arc::new(SqliteKeyValueStore::open(path)?),
        None => Arc::new(MemoryKeyValueStore::new()),
    };
    Ok(store)
}

fn remote_service(config: &DataConfig) -> DataResult<Arc<dyn TableService>> {
    let remote = config.remote()?;
    Ok(Arc::new(RestTableService::new(&remote)?))
}
