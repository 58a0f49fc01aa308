//! Worker Directory Accessor
//!
//! Read-side view of the `trabajadores` table: the directory system owns
//! the data, this service reads it by dependency scope and caches the list
//! for a short TTL.

use crate::error::Result;
use crate::services::cache::QueryCache;
use crate::storage::StorageBackend;
use crate::types::{AccessScope, Worker, WorkerId};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const WORKER_LIST_KEY: &str = "all";

/// Cached accessor over the worker directory
pub struct WorkerDirectory {
    storage: Arc<dyn StorageBackend>,
    cache: QueryCache<&'static str, Vec<Worker>>,
}

impl WorkerDirectory {
    pub fn new(storage: Arc<dyn StorageBackend>, ttl: Duration) -> Self {
        Self {
            storage,
            cache: QueryCache::new(1, ttl),
        }
    }

    /// All workers, cached
    pub async fn all(&self) -> Result<Vec<Worker>> {
        if let Some(workers) = self.cache.get(&WORKER_LIST_KEY) {
            debug!("Worker list served from cache ({} rows)", workers.len());
            return Ok(workers);
        }

        let workers = self.storage.list_workers().await?;
        self.cache.insert(WORKER_LIST_KEY, workers.clone());
        Ok(workers)
    }

    /// Workers visible under the given scope, ordered by name
    pub async fn in_scope(&self, scope: &AccessScope) -> Result<Vec<Worker>> {
        let workers = self.all().await?;
        Ok(workers
            .into_iter()
            .filter(|w| scope.permits(&w.dependencia))
            .collect())
    }

    /// One worker by id; NotFound when the id does not resolve
    pub async fn get(&self, id: WorkerId) -> Result<Worker> {
        self.storage.get_worker(id).await
    }

    /// Drop the cached list so the next read hits storage
    pub fn invalidate(&self) {
        self.cache.clear();
    }
}
