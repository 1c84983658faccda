//! Route definitions for the `/scans` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::scans;
use crate::state::AppState;

/// Routes mounted at `/scans`.
///
/// ```text
/// POST   /                -> submit_scan
/// GET    /status          -> get_status
/// GET    /results         -> get_results
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(scans::submit_scan))
        .route("/status", get(scans::get_status))
        .route("/results", get(scans::get_results))
}
