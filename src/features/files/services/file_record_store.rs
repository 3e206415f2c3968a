use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::files::models::{FileRecord, NewFileRecord};

/// Persistent collection of file records, ordered by upload time
#[async_trait]
pub trait FileRecordStore: Send + Sync {
    /// Insert a record; the store assigns `id` and `upload_date`
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord>;

    /// Most recently uploaded record, if any
    async fn find_latest(&self) -> Result<Option<FileRecord>>;

    /// Remove a record. Returns `false` when no record had this id.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool>;
}

/// Postgres-backed store over the `file_records` table
pub struct PgFileRecordStore {
    pool: PgPool,
}

impl PgFileRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRecordStore for PgFileRecordStore {
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord> {
        let inserted = sqlx::query_as::<_, FileRecord>(
            r#"
            INSERT INTO file_records (id, original_name, stored_name, path, size)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, original_name, stored_name, path, size, upload_date
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&record.original_name)
        .bind(&record.stored_name)
        .bind(&record.path)
        .bind(record.size)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn find_latest(&self) -> Result<Option<FileRecord>> {
        let latest = sqlx::query_as::<_, FileRecord>(
            r#"
            SELECT id, original_name, stored_name, path, size, upload_date
            FROM file_records
            ORDER BY upload_date DESC, id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(latest)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM file_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
