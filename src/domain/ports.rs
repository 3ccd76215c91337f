use crate::domain::task::TransferTask;
use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Durable keyed storage for task records.
///
/// Each operation is atomic at the granularity of one task record. `delete`
/// is an operator capability; the state machine itself never deletes.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn put(&self, task: TransferTask) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<TransferTask>>;
    async fn list(&self) -> Result<Vec<TransferTask>>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

pub type TaskStoreBox = Box<dyn TaskStore>;
