mod file_record_store;
mod file_service;

pub use file_record_store::{FileRecordStore, PgFileRecordStore};
pub use file_service::FileService;
