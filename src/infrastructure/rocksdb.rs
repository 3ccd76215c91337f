use crate::domain::ports::TaskStore;
use crate::domain::task::TransferTask;
use crate::error::{Result, TransferError};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Column family holding task records, keyed by uuid bytes.
pub const CF_TASKS: &str = "tasks";

fn storage_err(e: impl std::fmt::Display) -> TransferError {
    TransferError::Storage(e.to_string())
}

/// A persistent task store backed by RocksDB.
///
/// Task records are stored as JSON values under their uuid key. The struct is
/// thread-safe; `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDbTaskStore {
    db: Arc<DB>,
}

impl RocksDbTaskStore {
    /// Opens or creates a RocksDB instance at `path`, ensuring the tasks
    /// column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_tasks = ColumnFamilyDescriptor::new(CF_TASKS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_tasks]).map_err(storage_err)?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(CF_TASKS)
            .ok_or_else(|| storage_err("tasks column family not found"))
    }
}

#[async_trait]
impl TaskStore for RocksDbTaskStore {
    async fn put(&self, task: TransferTask) -> Result<()> {
        let cf = self.cf()?;
        let value = serde_json::to_vec(&task)?;
        self.db
            .put_cf(cf, task.id.as_bytes(), value)
            .map_err(storage_err)?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<TransferTask>> {
        let cf = self.cf()?;
        match self.db.get_cf(cf, id.as_bytes()).map_err(storage_err)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<TransferTask>> {
        let cf = self.cf()?;
        let mut tasks = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item.map_err(storage_err)?;
            tasks.push(serde_json::from_slice(&value)?);
        }
        Ok(tasks)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let cf = self.cf()?;
        let exists = self
            .db
            .get_pinned_cf(cf, id.as_bytes())
            .map_err(storage_err)?
            .is_some();
        if exists {
            self.db.delete_cf(cf, id.as_bytes()).map_err(storage_err)?;
        }
        Ok(exists)
    }
}
