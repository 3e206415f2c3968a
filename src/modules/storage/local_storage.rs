//! Local disk storage client
//!
//! Writes uploaded bytes into a single vault directory, opens them again for
//! download and removes them on delete. Names are chosen by the caller; this
//! client only resolves them against the configured root.

use axum::body::Bytes;
use futures::{Stream, StreamExt};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::core::config::StorageConfig;
use crate::core::error::{AppError, Result};

/// Result of a completed write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub path: PathBuf,
    pub size: u64,
}

/// Storage client rooted at the vault directory
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            root: config.upload_path,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the vault directory if it does not exist yet
    pub async fn ensure_root_exists(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        info!("Storage directory ready: {}", self.root.display());
        Ok(())
    }

    /// Full path of `stored_name` inside the vault
    pub fn resolve(&self, stored_name: &str) -> PathBuf {
        self.root.join(stored_name)
    }

    /// Stream `data` into a new file named `stored_name`.
    ///
    /// The file must not exist yet. A failure while reading `data` removes
    /// the partial file and is returned as the stream's own error converted
    /// into `AppError`. The file is synced to disk before returning.
    pub async fn write_stream<S, E>(&self, stored_name: &str, data: S) -> Result<StoredFile>
    where
        S: Stream<Item = std::result::Result<Bytes, E>> + Send,
        E: Into<AppError> + Send,
    {
        let path = self.resolve(stored_name);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        futures::pin_mut!(data);
        let mut size: u64 = 0;

        while let Some(chunk) = data.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    let err = e.into();
                    debug!("Failed to read upload stream for {}: {}", stored_name, err);
                    drop(file);
                    self.discard(&path).await;
                    return Err(err);
                }
            };

            if let Err(e) = file.write_all(&chunk).await {
                drop(file);
                self.discard(&path).await;
                return Err(AppError::Storage(e));
            }
            size += chunk.len() as u64;
        }

        file.flush().await?;
        file.sync_all().await?;

        debug!("Wrote {} bytes to {}", size, path.display());

        Ok(StoredFile { path, size })
    }

    /// Open `stored_name` for reading, returning the handle and its length
    pub async fn open(&self, stored_name: &str) -> Result<(File, u64)> {
        let path = self.resolve(stored_name);
        let file = File::open(&path).await?;
        let metadata = file.metadata().await?;

        if !metadata.is_file() {
            return Err(AppError::Storage(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            )));
        }

        Ok((file, metadata.len()))
    }

    /// Remove the file at `path` if it is there.
    ///
    /// Returns whether a file was actually removed. A file that disappears
    /// between the existence check and the removal counts as absent.
    pub async fn remove_if_exists(&self, path: &Path) -> Result<bool> {
        if !fs::try_exists(path).await? {
            return Ok(false);
        }

        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::Storage(e)),
        }
    }

    async fn discard(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            warn!("Could not remove partial upload {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use tokio::io::AsyncReadExt;

    fn storage_in(dir: &Path) -> LocalStorage {
        LocalStorage::new(StorageConfig {
            upload_path: dir.to_path_buf(),
        })
    }

    fn chunks(parts: &[&'static [u8]]) -> impl Stream<Item = std::result::Result<Bytes, io::Error>> {
        stream::iter(
            parts
                .iter()
                .copied()
                .map(|p| Ok::<_, io::Error>(Bytes::from_static(p)))
                .collect::<Vec<_>>(),
        )
    }

    #[tokio::test]
    async fn test_write_stream_counts_bytes_across_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(dir.path());

        let stored = storage
            .write_stream("1-a.txt", chunks(&[&b"01234"[..], &b"56789"[..]]))
            .await
            .unwrap();

        assert_eq!(stored.size, 10);
        assert_eq!(stored.path, dir.path().join("1-a.txt"));
        assert_eq!(std::fs::read(&stored.path).unwrap(), b"0123456789");
    }

    #[tokio::test]
    async fn test_write_stream_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(dir.path());
        std::fs::write(dir.path().join("1-a.txt"), b"original").unwrap();

        let result = storage.write_stream("1-a.txt", chunks(&[&b"new"[..]])).await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        assert_eq!(std::fs::read(dir.path().join("1-a.txt")).unwrap(), b"original");
    }

    #[tokio::test]
    async fn test_write_stream_discards_partial_file_and_keeps_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(dir.path());
        let data = stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(AppError::PayloadTooLarge("File too large.".to_string())),
        ]);

        let result = storage.write_stream("1-a.txt", data).await;

        assert!(matches!(result, Err(AppError::PayloadTooLarge(ref m)) if m == "File too large."));
        assert!(!dir.path().join("1-a.txt").exists());
    }

    #[tokio::test]
    async fn test_open_returns_length() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(dir.path());
        std::fs::write(dir.path().join("1-a.txt"), b"hello").unwrap();

        let (mut file, len) = storage.open("1-a.txt").await.unwrap();
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).await.unwrap();

        assert_eq!(len, 5);
        assert_eq!(contents, b"hello");
    }

    #[tokio::test]
    async fn test_open_missing_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(dir.path());

        assert!(matches!(
            storage.open("missing.txt").await,
            Err(AppError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn test_remove_if_exists() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(dir.path());
        let path = dir.path().join("1-a.txt");
        std::fs::write(&path, b"x").unwrap();

        assert!(storage.remove_if_exists(&path).await.unwrap());
        assert!(!path.exists());
        assert!(!storage.remove_if_exists(&path).await.unwrap());
    }

    #[tokio::test]
    async fn test_ensure_root_exists_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir.path().join("nested").join("vault"));

        storage.ensure_root_exists().await.unwrap();

        assert!(storage.root().is_dir());
    }
}
