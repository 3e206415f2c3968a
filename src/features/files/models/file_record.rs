use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata for one file stored in the vault
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct FileRecord {
    pub id: Uuid,
    /// Filename supplied by the client
    pub original_name: String,
    /// Name on disk: `<unix-millis>-<original_name>`
    pub stored_name: String,
    /// Full path of the stored bytes
    pub path: String,
    pub size: i64,
    pub upload_date: DateTime<Utc>,
}

/// Insert payload; the store assigns `id` and `upload_date`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFileRecord {
    pub original_name: String,
    pub stored_name: String,
    pub path: String,
    pub size: i64,
}
