//! In-memory registry of submitted scan jobs.
//!
//! The store is the only shared mutable state in the service. It is
//! thread-safe via an interior `RwLock` and designed to be wrapped in `Arc`.
//! Records are never evicted.

use std::collections::HashMap;

use scanlab_core::scan::Stage;
use scanlab_core::types::{JobId, Timestamp};
use tokio::sync::RwLock;

/// One submitted analysis request.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: JobId,
    /// Immutable once set.
    pub submitted_at: Timestamp,
    /// Stage seen by the most recent status call. Observability only; the
    /// authoritative stage is always re-derived from elapsed time.
    pub last_stage: Stage,
    /// Names of the uploaded files. Content is not retained.
    pub file_names: Vec<String>,
}

impl Job {
    pub fn new(id: JobId, submitted_at: Timestamp, file_names: Vec<String>) -> Self {
        Self {
            id,
            submitted_at,
            last_stage: Stage::Queued,
            file_names,
        }
    }
}

/// Keyed job registry.
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `job` unless its id is already taken.
    ///
    /// Returns `false` (leaving the existing record untouched) on collision.
    pub async fn insert(&self, job: Job) -> bool {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return false;
        }
        jobs.insert(job.id.clone(), job);
        true
    }

    /// Snapshot of the record for `id`.
    pub async fn get(&self, id: &str) -> Option<Job> {
        self.jobs.read().await.get(id).cloned()
    }

    /// Cache the most recently computed stage. Returns `false` if unknown.
    pub async fn record_stage(&self, id: &str, stage: Stage) -> bool {
        match self.jobs.write().await.get_mut(id) {
            Some(job) => {
                job.last_stage = stage;
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}
