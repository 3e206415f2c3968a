use async_trait::async_trait;
use chrono::Utc;
use std::path::Path;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::core::config::StorageConfig;
use crate::core::error::{AppError, Result};
use crate::features::files::models::{FileRecord, NewFileRecord};
use crate::features::files::services::{FileRecordStore, FileService};
use crate::modules::storage::LocalStorage;

/// File record store kept in memory, in insertion order
#[derive(Default)]
pub struct InMemoryFileRecordStore {
    records: Mutex<Vec<FileRecord>>,
}

impl InMemoryFileRecordStore {
    pub fn records(&self) -> Vec<FileRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl FileRecordStore for InMemoryFileRecordStore {
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord> {
        let record = FileRecord {
            id: Uuid::now_v7(),
            original_name: record.original_name,
            stored_name: record.stored_name,
            path: record.path,
            size: record.size,
            upload_date: Utc::now(),
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn find_latest(&self) -> Result<Option<FileRecord>> {
        // max_by_key keeps the last of equal maxima, i.e. the newest insert
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .max_by_key(|r| r.upload_date)
            .cloned())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() < before)
    }
}

/// Store whose backing connection is down
pub struct UnavailableFileRecordStore;

#[async_trait]
impl FileRecordStore for UnavailableFileRecordStore {
    async fn insert(&self, _record: NewFileRecord) -> Result<FileRecord> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find_latest(&self) -> Result<Option<FileRecord>> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn delete_by_id(&self, _id: Uuid) -> Result<bool> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }
}

/// Store whose records are removed by someone else just before each delete,
/// so `delete_by_id` always finds nothing left to remove
pub struct ConcurrentlyDeletedFileRecordStore {
    pub inner: InMemoryFileRecordStore,
}

#[async_trait]
impl FileRecordStore for ConcurrentlyDeletedFileRecordStore {
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord> {
        self.inner.insert(record).await
    }

    async fn find_latest(&self) -> Result<Option<FileRecord>> {
        self.inner.find_latest().await
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        self.inner.delete_by_id(id).await?;
        self.inner.delete_by_id(id).await
    }
}

pub fn local_storage(dir: &Path) -> Arc<LocalStorage> {
    Arc::new(LocalStorage::new(StorageConfig {
        upload_path: dir.to_path_buf(),
    }))
}

pub fn file_service(store: Arc<dyn FileRecordStore>, dir: &Path) -> Arc<FileService> {
    Arc::new(FileService::new(store, local_storage(dir)))
}

/// Names of the entries in a directory, sorted
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_record(name: &str) -> NewFileRecord {
        NewFileRecord {
            original_name: name.to_string(),
            stored_name: format!("1-{}", name),
            path: format!("/vault/1-{}", name),
            size: 1,
        }
    }

    #[tokio::test]
    async fn test_delete_by_id_reports_missing_record() {
        let store = InMemoryFileRecordStore::default();
        let record = store.insert(new_record("a.txt")).await.unwrap();

        assert!(store.delete_by_id(record.id).await.unwrap());
        assert!(!store.delete_by_id(record.id).await.unwrap());
        assert!(store.records().is_empty());
    }

    #[tokio::test]
    async fn test_find_latest_returns_newest_insert() {
        let store = InMemoryFileRecordStore::default();
        store.insert(new_record("old.txt")).await.unwrap();
        store.insert(new_record("new.txt")).await.unwrap();

        let latest = store.find_latest().await.unwrap().unwrap();
        assert_eq!(latest.original_name, "new.txt");
    }
}
