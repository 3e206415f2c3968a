use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

/// Multipart field that carries the uploaded file
pub const FILE_FIELD_NAME: &str = "myFile";

pub const NO_FILE_UPLOADED: &str = "No file uploaded.";
pub const NO_FILES_IN_VAULT: &str = "No files found in the vault.";
pub const NOTHING_TO_DELETE: &str = "Nothing to delete.";
pub const DOWNLOAD_FAILED: &str = "Could not download file.";
pub const DELETE_FAILED: &str = "Could not delete file.";
pub const UPLOAD_TOO_LARGE: &str = "File too large.";
pub const UPLOAD_UNREADABLE: &str = "Could not read uploaded file.";

/// Upload form for OpenAPI documentation.
/// The handler reads the multipart stream directly.
#[derive(Debug, Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The file to store in the vault
    #[serde(rename = "myFile")]
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub my_file: String,
}

/// Reduce a client-supplied filename to its last path component.
///
/// Returns `None` for a missing or empty name.
pub fn original_file_name(raw: Option<&str>) -> Option<String> {
    let name = raw?.rsplit(['/', '\\']).next()?.trim();
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}

/// On-disk name for an upload received at `now`
pub fn stored_name_for(now: DateTime<Utc>, original_name: &str) -> String {
    format!("{}-{}", now.timestamp_millis(), original_name)
}

pub fn upload_success_message(stored_name: &str) -> String {
    format!("Success! Saved as {}", stored_name)
}

pub fn delete_success_message(original_name: &str) -> String {
    format!("Deleted {} successfully.", original_name)
}
