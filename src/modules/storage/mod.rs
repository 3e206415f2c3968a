//! Storage module for file management
//!
//! Provides the local disk client the vault writes uploads into.

mod local_storage;

pub use local_storage::LocalStorage;
