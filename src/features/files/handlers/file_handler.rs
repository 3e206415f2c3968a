use axum::{
    body::Body,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use futures::TryStreamExt;
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::core::error::{AppError, GENERIC_SERVER_ERROR};
use crate::features::files::dtos::{
    delete_success_message, original_file_name, upload_success_message, UploadFileDto,
    DELETE_FAILED, FILE_FIELD_NAME, NO_FILE_UPLOADED, UPLOAD_TOO_LARGE, UPLOAD_UNREADABLE,
};
use crate::features::files::models::FileRecord;
use crate::features::files::services::FileService;
use crate::shared::http::{attachment_disposition, content_type_for};

/// Upload a file into the vault
///
/// Accepts multipart/form-data with a single file under `myFile`.
/// Other fields are ignored.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "files",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "Form with the file in the `myFile` field",
    ),
    responses(
        (status = 200, description = "File stored", body = String, content_type = "text/plain"),
        (status = 400, description = "No file in the `myFile` field, or the body could not be read", body = String, content_type = "text/plain"),
        (status = 413, description = "Upload exceeds the size limit", body = String, content_type = "text/plain"),
        (status = 500, description = "Disk or database failure", body = String, content_type = "text/plain")
    )
)]
pub async fn upload_file(
    State(service): State<Arc<FileService>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<String, AppError> {
    // Not a multipart request at all: there is no file to store
    let mut multipart = multipart.map_err(|e| {
        debug!("Rejected upload body: {}", e);
        AppError::BadRequest(NO_FILE_UPLOADED.to_string())
    })?;
    let mut saved: Option<FileRecord> = None;

    while let Some(field) = multipart.next_field().await.map_err(upload_read_error)? {
        if field.name() != Some(FILE_FIELD_NAME) {
            debug!("Ignoring field: {:?}", field.name());
            continue;
        }

        // A part without a filename is a text field, not a file
        let Some(original_name) = original_file_name(field.file_name()) else {
            debug!("Ignoring {} part without a filename", FILE_FIELD_NAME);
            continue;
        };

        let record = service
            .upload_file(&original_name, field.map_err(upload_read_error))
            .await
            .map_err(|e| e.with_failure_message(GENERIC_SERVER_ERROR))?;
        saved = Some(record);
        break;
    }

    let record = saved.ok_or_else(|| AppError::BadRequest(NO_FILE_UPLOADED.to_string()))?;

    Ok(upload_success_message(&record.stored_name))
}

/// Map a failure reading the request body to the caller-facing error
fn upload_read_error(e: MultipartError) -> AppError {
    debug!("Failed to read upload body: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(UPLOAD_TOO_LARGE.to_string())
    } else {
        AppError::BadRequest(UPLOAD_UNREADABLE.to_string())
    }
}

/// Download the most recently uploaded file
#[utoipa::path(
    get,
    path = "/download/latest",
    tag = "files",
    responses(
        (status = 200, description = "File contents as an attachment named after the original upload",
            body = String, content_type = "application/octet-stream"),
        (status = 404, description = "The vault is empty", body = String, content_type = "text/plain"),
        (status = 500, description = "File unreadable or database failure", body = String, content_type = "text/plain")
    )
)]
pub async fn download_latest(
    State(service): State<Arc<FileService>>,
) -> Result<Response, AppError> {
    let download = service
        .download_latest()
        .await
        .map_err(|e| e.with_failure_message(GENERIC_SERVER_ERROR))?;

    let headers = [
        (
            header::CONTENT_TYPE,
            content_type_for(&download.record.original_name),
        ),
        (
            header::CONTENT_DISPOSITION,
            attachment_disposition(&download.record.original_name),
        ),
        (header::CONTENT_LENGTH, download.len.to_string()),
    ];
    let body = Body::from_stream(ReaderStream::new(download.file));

    Ok((headers, body).into_response())
}

/// Delete the most recently uploaded file and its record
#[utoipa::path(
    delete,
    path = "/delete/latest",
    tag = "files",
    responses(
        (status = 200, description = "File and record removed", body = String, content_type = "text/plain"),
        (status = 404, description = "The vault is empty", body = String, content_type = "text/plain"),
        (status = 500, description = "Removal failed", body = String, content_type = "text/plain")
    )
)]
pub async fn delete_latest(
    State(service): State<Arc<FileService>>,
) -> Result<String, AppError> {
    let record = service
        .delete_latest()
        .await
        .map_err(|e| e.with_failure_message(DELETE_FAILED))?;

    Ok(delete_success_message(&record.original_name))
}
