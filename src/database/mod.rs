//! # Task Storage
//!
//! The [`TaskStore`] trait is the only seam between the services and the
//! document collection. Two backends implement it:
//!
//! - [`memory`] - an id-ordered in-process map, evaluating predicates and
//!   aggregation pipelines directly
//! - [`postgres`] - one JSONB document per row, with predicates and
//!   pipelines rendered to SQL by [`crate::query_builder`]
//!
//! Stores persist documents exactly as given. Timestamps, defaults and the
//! completion invariant are the caller's responsibility.
//!
//! ## Example Usage
//!
//! ```rust
//! use taskboard::database::{MemoryTaskStore, TaskStore};
//! use taskboard::models::Task;
//! use taskboard::query_builder::{Predicate, SortSpec};
//!
//! # async fn example() -> taskboard::error::Result<()> {
//! let store = MemoryTaskStore::new();
//! store.insert(Task::new("Write report", chrono::Utc::now())).await?;
//! let all = store.find(&Predicate::match_all(), SortSpec::default(), None).await?;
//! assert_eq!(all.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::Result;
use crate::models::Task;
use crate::query_builder::{AggregationPipeline, GroupResult, PageWindow, Predicate, SortSpec};

pub use memory::MemoryTaskStore;
pub use postgres::PgTaskStore;

/// Document collection of tasks
#[async_trait]
pub trait TaskStore: Send + Sync + Debug {
    /// Short backend name for logs and health output
    fn backend_name(&self) -> &'static str;

    /// Insert a new document. Fails if the id is already present.
    async fn insert(&self, task: Task) -> Result<Task>;

    /// Insert several documents atomically
    async fn insert_many(&self, tasks: Vec<Task>) -> Result<Vec<Task>>;

    async fn get(&self, id: Uuid) -> Result<Option<Task>>;

    /// Overwrite an existing document. Fails with not-found if absent.
    async fn replace(&self, task: Task) -> Result<Task>;

    /// Remove a document, returning it if it existed
    async fn delete(&self, id: Uuid) -> Result<Option<Task>>;

    /// Remove every listed document; returns how many existed
    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64>;

    /// Documents matching `predicate`, ordered by `sort`, optionally windowed
    async fn find(
        &self,
        predicate: &Predicate,
        sort: SortSpec,
        window: Option<PageWindow>,
    ) -> Result<Vec<Task>>;

    /// Number of documents matching `predicate`
    async fn count(&self, predicate: &Predicate) -> Result<u64>;

    async fn aggregate(&self, pipeline: &AggregationPipeline) -> Result<Vec<GroupResult>>;

    async fn health_check(&self) -> Result<()>;
}

/// Open the backend selected by `config`
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn TaskStore>> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryTaskStore::new())),
        StorageBackend::Postgres => Ok(Arc::new(PgTaskStore::connect(config).await?)),
    }
}
