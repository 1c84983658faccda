/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Opaque job identifier (e.g. `scan-1718000000000-k3j9x0a1b`).
pub type JobId = String;
