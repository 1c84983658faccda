//! Scanlab API server library.
//!
//! Exposes the building blocks (config, state, job service, error handling,
//! routes, HTTP client) so integration tests and the binary entrypoint can
//! both access them.

pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;
