use crate::domain::ports::TaskStore;
use crate::domain::task::TransferTask;
use crate::error::Result;
use async_trait::async_trait;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Durable task store backed by a single JSON document.
///
/// The whole document is read, modified and rewritten per operation, which is
/// fine for the operator-scale task counts this tool handles. A mutex
/// serializes writers within this process so read-modify-write cycles do not
/// interleave.
pub struct JsonFileTaskStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileTaskStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    fn read_all(&self) -> Result<Vec<TransferTask>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, tasks: &[TransferTask]) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(tasks)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}

#[async_trait]
impl TaskStore for JsonFileTaskStore {
    async fn put(&self, task: TransferTask) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut tasks = self.read_all()?;
        match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => *slot = task,
            None => tasks.push(task),
        }
        self.write_all(&tasks)
    }

    async fn get(&self, id: Uuid) -> Result<Option<TransferTask>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all()?.into_iter().find(|t| t.id == id))
    }

    async fn list(&self) -> Result<Vec<TransferTask>> {
        let _guard = self.lock.lock().await;
        self.read_all()
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut tasks = self.read_all()?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Ok(false);
        }
        self.write_all(&tasks)?;
        Ok(true)
    }
}
