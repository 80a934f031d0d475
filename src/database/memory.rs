use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use uuid::Uuid;

use super::TaskStore;
use crate::error::{Result, TaskboardError};
use crate::models::Task;
use crate::query_builder::{AggregationPipeline, GroupResult, PageWindow, Predicate, SortSpec};

/// In-process task collection.
///
/// Documents are kept in id order; ids are time-ordered UUIDs, so unsorted
/// scans and sort ties come out in creation order.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<BTreeMap<Uuid, Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeded store, for tests and demos
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        Self {
            tasks: RwLock::new(tasks.into_iter().map(|t| (t.id, t)).collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.read().is_empty()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, task: Task) -> Result<Task> {
        let mut tasks = self.tasks.write();
        if tasks.contains_key(&task.id) {
            return Err(TaskboardError::Storage(format!(
                "Duplicate task id: {}",
                task.id
            )));
        }
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn insert_many(&self, new_tasks: Vec<Task>) -> Result<Vec<Task>> {
        let mut tasks = self.tasks.write();
        if let Some(dup) = new_tasks.iter().find(|t| tasks.contains_key(&t.id)) {
            return Err(TaskboardError::Storage(format!(
                "Duplicate task id: {}",
                dup.id
            )));
        }
        for task in &new_tasks {
            tasks.insert(task.id, task.clone());
        }
        Ok(new_tasks)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Task>> {
        Ok(self.tasks.read().get(&id).cloned())
    }

    async fn replace(&self, task: Task) -> Result<Task> {
        let mut tasks = self.tasks.write();
        match tasks.get_mut(&task.id) {
            Some(slot) => {
                *slot = task.clone();
                Ok(task)
            }
            None => Err(TaskboardError::task_not_found(task.id)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Task>> {
        Ok(self.tasks.write().remove(&id))
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64> {
        let mut tasks = self.tasks.write();
        let removed = ids.iter().filter(|id| tasks.remove(id).is_some()).count();
        Ok(removed as u64)
    }

    async fn find(
        &self,
        predicate: &Predicate,
        sort: SortSpec,
        window: Option<PageWindow>,
    ) -> Result<Vec<Task>> {
        let mut matched: Vec<Task> = self
            .tasks
            .read()
            .values()
            .filter(|task| predicate.matches(task))
            .cloned()
            .collect();
        sort.sort(&mut matched);

        Ok(match window {
            Some(window) => matched
                .into_iter()
                .skip(usize::try_from(window.offset).unwrap_or(usize::MAX))
                .take(usize::try_from(window.limit).unwrap_or(usize::MAX))
                .collect(),
            None => matched,
        })
    }

    async fn count(&self, predicate: &Predicate) -> Result<u64> {
        let tasks = self.tasks.read();
        Ok(tasks.values().filter(|task| predicate.matches(task)).count() as u64)
    }

    async fn aggregate(&self, pipeline: &AggregationPipeline) -> Result<Vec<GroupResult>> {
        Ok(pipeline.evaluate(self.tasks.read().values()))
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
