//! Static HTML dashboard served at `/`.

pub mod routes;

pub use routes::routes;
