//! Request handlers.
//!
//! Handlers delegate to [`JobService`](crate::service::JobService) and map
//! errors via [`AppError`](crate::error::AppError).

pub mod scans;
