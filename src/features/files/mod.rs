//! The vault: single-file upload, download-latest and delete-latest.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/upload` | Store the `myFile` multipart field |
//! | GET | `/download/latest` | Stream the most recent upload |
//! | DELETE | `/delete/latest` | Remove the most recent upload and its record |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::{FileService, PgFileRecordStore};
