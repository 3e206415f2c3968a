pub mod dashboard;
pub mod files;
