//! Storage actor clients.
//!
//! The backend that owns persistent records is an external collaborator; this
//! module only knows how to talk to it. [`ResourceStore`] is the seam the
//! batch submitter and the export path depend on, with two implementations:
//!
//! - [`HttpResourceStore`] - JSON over HTTP against the actor's REST facade
//! - [`InMemoryResourceStore`] - demo mode and tests

use std::sync::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::models::Resource;

/// Minimal storage actor surface the import pipeline depends on.
#[allow(async_fn_in_trait)]
pub trait ResourceStore {
    /// Create all records in one call. All-or-nothing from the caller's
    /// perspective: an error means none of the records are assumed stored.
    async fn bulk_create_resources(&self, records: Vec<Resource>) -> StoreResult<()>;

    /// Fetch every stored record (used by CSV export).
    async fn fetch_resources(&self) -> StoreResult<Vec<Resource>>;
}

// =============================================================================
// HTTP client
// =============================================================================

/// Storage actor client over its HTTP facade.
#[derive(Debug, Clone)]
pub struct HttpResourceStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpResourceStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client: reqwest::Client::new() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl ResourceStore for HttpResourceStore {
    async fn bulk_create_resources(&self, records: Vec<Resource>) -> StoreResult<()> {
        let url = format!("{}/resources/bulk", self.base_url);
        let response = self.client.post(&url).json(&records).send().await?;
        if !response.status().is_success() {
            return Err(StoreError::Status(response.status().as_u16()));
        }
        Ok(())
    }

    async fn fetch_resources(&self) -> StoreResult<Vec<Resource>> {
        let url = format!("{}/resources", self.base_url);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(StoreError::Status(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// In-memory store for demo sessions and tests.
#[derive(Debug, Default)]
pub struct InMemoryResourceStore {
    records: Mutex<Vec<Resource>>,
}

impl InMemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResourceStore for InMemoryResourceStore {
    async fn bulk_create_resources(&self, records: Vec<Resource>) -> StoreResult<()> {
        self.records
            .lock()
            .map_err(|_| StoreError::Status(500))?
            .extend(records);
        Ok(())
    }

    async fn fetch_resources(&self) -> StoreResult<Vec<Resource>> {
        Ok(self
            .records
            .lock()
            .map_err(|_| StoreError::Status(500))?
            .clone())
    }
}

// =============================================================================
// Runtime store selection
// =============================================================================

/// Store selected at startup: HTTP when a store URL is configured, in-memory
/// otherwise.
#[derive(Debug)]
pub enum AnyStore {
    Http(HttpResourceStore),
    Memory(InMemoryResourceStore),
}

impl AnyStore {
    pub fn from_url(url: Option<String>) -> Self {
        match url {
            Some(url) => Self::Http(HttpResourceStore::new(url)),
            None => Self::Memory(InMemoryResourceStore::new()),
        }
    }
}

impl ResourceStore for AnyStore {
    async fn bulk_create_resources(&self, records: Vec<Resource>) -> StoreResult<()> {
        match self {
            Self::Http(store) => store.bulk_create_resources(records).await,
            Self::Memory(store) => store.bulk_create_resources(records).await,
        }
    }

    async fn fetch_resources(&self) -> StoreResult<Vec<Resource>> {
        match self {
            Self::Http(store) => store.fetch_resources().await,
            Self::Memory(store) => store.fetch_resources().await,
        }
    }
}
