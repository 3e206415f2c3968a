use axum::Router;
use std::path::Path;
use tower_http::services::ServeFile;

/// Serve the dashboard page at `/`
pub fn routes(dashboard_path: &Path) -> Router {
    Router::new().route_service("/", ServeFile::new(dashboard_path))
}
