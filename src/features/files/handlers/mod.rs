pub mod file_handler;

pub use file_handler::{
    __path_delete_latest, __path_download_latest, __path_upload_file, delete_latest,
    download_latest, upload_file,
};
