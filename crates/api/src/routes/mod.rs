pub mod health;
pub mod scans;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /scans                                           submit (multipart POST)
/// /scans/status?job_id=                            current stage and progress
/// /scans/results?job_id=                           diagnostic payload
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/scans", scans::router())
}
