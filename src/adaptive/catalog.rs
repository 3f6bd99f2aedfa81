use std::collections::HashMap;

use parking_lot::RwLock;

use crate::adaptive::types::{Difficulty, Task};

pub const DEFAULT_QUERY_LIMIT: usize = 10;

/// Resolves task ids to the generated task content. Implemented by whatever
/// store owns the tasks; the engine only ever reads through this.
pub trait TaskLookup: Send + Sync {
    fn task(&self, task_id: &str) -> Option<Task>;
}

/// In-process task store, kept in insertion order for listing.
#[derive(Default)]
pub struct TaskCatalog {
    inner: RwLock<CatalogInner>,
}

#[derive(Default)]
struct CatalogInner {
    order: Vec<String>,
    tasks: HashMap<String, Task>,
}

impl TaskCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let catalog = Self::new();
        for task in tasks {
            catalog.insert(task);
        }
        catalog
    }

    /// Replaces any task with the same id in place.
    pub fn insert(&self, task: Task) {
        let mut inner = self.inner.write();
        if !inner.tasks.contains_key(&task.id) {
            inner.order.push(task.id.clone());
        }
        inner.tasks.insert(task.id.clone(), task);
    }

    pub fn get(&self, task_id: &str) -> Option<Task> {
        self.inner.read().tasks.get(task_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn query(
        &self,
        topic: Option<&str>,
        difficulty: Option<Difficulty>,
        limit: Option<usize>,
    ) -> Vec<Task> {
        let topic = topic.map(str::to_lowercase);
        let limit = limit.unwrap_or(DEFAULT_QUERY_LIMIT);
        let inner = self.inner.read();

        inner
            .order
            .iter()
            .filter_map(|id| inner.tasks.get(id))
            .filter(|task| {
                topic
                    .as_deref()
                    .map_or(true, |t| task.topic.to_lowercase() == t)
            })
            .filter(|task| difficulty.map_or(true, |d| task.difficulty == d))
            .take(limit)
            .cloned()
            .collect()
    }
}

impl TaskLookup for TaskCatalog {
    fn task(&self, task_id: &str) -> Option<Task> {
        self.get(task_id)
    }
}
