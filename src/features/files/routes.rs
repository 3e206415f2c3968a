use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::features::files::handlers::{delete_latest, download_latest, upload_file};
use crate::features::files::services::FileService;

/// Create routes for the files feature
pub fn routes(file_service: Arc<FileService>, max_upload_size: usize) -> Router {
    Router::new()
        .route(
            "/upload",
            post(upload_file).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/download/latest", get(download_latest))
        .route("/delete/latest", delete(delete_latest))
        .with_state(file_service)
}
