//! Modules layer - Infrastructure components outside the HTTP features
//!
//! Contains the storage client the vault writes into.

pub mod storage;
