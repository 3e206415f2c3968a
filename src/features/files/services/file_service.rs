use axum::body::Bytes;
use chrono::Utc;
use futures::Stream;
use std::path::Path;
use std::sync::Arc;
use tokio::fs::File;
use tracing::{debug, info, warn};

use crate::core::error::{AppError, Result};
use crate::features::files::dtos::{
    stored_name_for, DOWNLOAD_FAILED, NOTHING_TO_DELETE, NO_FILES_IN_VAULT,
};
use crate::features::files::models::{FileRecord, NewFileRecord};
use crate::features::files::services::FileRecordStore;
use crate::modules::storage::LocalStorage;

/// An open handle on the latest file, ready to stream
pub struct FileDownload {
    pub record: FileRecord,
    pub file: File,
    pub len: u64,
}

/// Service for vault operations
pub struct FileService {
    store: Arc<dyn FileRecordStore>,
    storage: Arc<LocalStorage>,
}

impl FileService {
    pub fn new(store: Arc<dyn FileRecordStore>, storage: Arc<LocalStorage>) -> Self {
        Self { store, storage }
    }

    /// Write an upload to disk, then record its metadata.
    ///
    /// The record insert is only attempted once the bytes are fully written.
    /// If the insert fails the file stays on disk without a record.
    pub async fn upload_file<S, E>(&self, original_name: &str, data: S) -> Result<FileRecord>
    where
        S: Stream<Item = std::result::Result<Bytes, E>> + Send,
        E: Into<AppError> + Send,
    {
        let stored_name = stored_name_for(Utc::now(), original_name);

        let stored = self.storage.write_stream(&stored_name, data).await?;
        debug!("File written to vault: {}", stored.path.display());

        let size = i64::try_from(stored.size)
            .map_err(|_| AppError::Internal(format!("File size {} out of range", stored.size)))?;

        let record = self
            .store
            .insert(NewFileRecord {
                original_name: original_name.to_string(),
                stored_name,
                path: stored.path.to_string_lossy().into_owned(),
                size,
            })
            .await?;

        info!(
            "Saved {} to vault and database: id={}, stored_name={}, size={}",
            record.original_name, record.id, record.stored_name, record.size
        );

        Ok(record)
    }

    /// Open the most recently uploaded file
    pub async fn download_latest(&self) -> Result<FileDownload> {
        let record = self
            .store
            .find_latest()
            .await?
            .ok_or_else(|| AppError::NotFound(NO_FILES_IN_VAULT.to_string()))?;

        let (file, len) = self
            .storage
            .open(&record.stored_name)
            .await
            .map_err(|e| e.with_failure_message(DOWNLOAD_FAILED))?;

        debug!("Serving {} ({} bytes)", record.stored_name, len);

        Ok(FileDownload { record, file, len })
    }

    /// Remove the most recently uploaded file and its record.
    ///
    /// A file already missing from disk is skipped. The record is deleted
    /// either way; the two removals are not atomic.
    pub async fn delete_latest(&self) -> Result<FileRecord> {
        let record = self
            .store
            .find_latest()
            .await?
            .ok_or_else(|| AppError::NotFound(NOTHING_TO_DELETE.to_string()))?;

        if self.storage.remove_if_exists(Path::new(&record.path)).await? {
            info!("Physically deleted: {}", record.stored_name);
        } else {
            debug!("File already absent from vault: {}", record.path);
        }

        if self.store.delete_by_id(record.id).await? {
            info!("Database record erased: id={}", record.id);
        } else {
            warn!("Database record already gone: id={}", record.id);
        }

        Ok(record)
    }
}
