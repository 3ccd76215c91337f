use crate::domain::ports::TaskStore;
use crate::domain::task::TransferTask;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A thread-safe in-memory task store.
///
/// Uses `Arc<RwLock<HashMap<Uuid, TransferTask>>>` for shared concurrent
/// access. Ideal for tests and one-shot runs where durability is not needed.
#[derive(Default, Clone)]
pub struct InMemoryTaskStore {
    tasks: Arc<RwLock<HashMap<Uuid, TransferTask>>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn put(&self, task: TransferTask) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id, task);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<TransferTask>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<TransferTask>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.values().cloned().collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks.remove(&id).is_some())
    }
}
