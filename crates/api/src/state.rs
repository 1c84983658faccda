use std::sync::Arc;

use crate::config::ServerConfig;
use crate::service::JobService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Scan job service (owns the in-memory job store).
    pub jobs: Arc<JobService>,
}
