//! Scan job orchestration: submit, status and results.
//!
//! [`JobService`] owns the [`JobStore`] and derives every status from the
//! injected [`Clock`] and [`StageSchedule`]. Nothing here sleeps or performs
//! I/O; simulated latency belongs to the transport.

use std::sync::Arc;

use async_trait::async_trait;
use scanlab_core::clock::{elapsed_secs, Clock, SystemClock};
use scanlab_core::error::CoreError;
use scanlab_core::ids::{IdProvider, ScanIdProvider};
use scanlab_core::polling::StatusSource;
use scanlab_core::scan::{ScanResult, Stage, StatusReport, SubmitReceipt};
use scanlab_core::selector;
use scanlab_core::stage::{self, SimulatedSchedule, StageSchedule};

use crate::store::{Job, JobStore};

/// Message returned with every accepted submission.
pub const SUBMIT_MESSAGE: &str = "Upload successful. Processing started.";

/// Entity name used in `NotFound` errors.
const JOB_ENTITY: &str = "Scan job";

/// How many fresh ids to try before giving up on a submission.
const MAX_ID_ATTEMPTS: usize = 8;

pub struct JobService {
    store: JobStore,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdProvider>,
    schedule: Arc<dyn StageSchedule>,
}

impl JobService {
    /// Service on the simulated schedule with the given clock and id source.
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdProvider>) -> Self {
        Self {
            store: JobStore::new(),
            clock,
            ids,
            schedule: Arc::new(SimulatedSchedule),
        }
    }

    /// Production wiring: wall clock and random scan ids.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(ScanIdProvider))
    }

    /// Swap the stage source, e.g. for a real processing backend.
    pub fn with_schedule(mut self, schedule: Arc<dyn StageSchedule>) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn store(&self) -> &JobStore {
        &self.store
    }

    /// Register a new job for the uploaded `file_names`.
    pub async fn submit(&self, file_names: Vec<String>) -> Result<SubmitReceipt, CoreError> {
        if file_names.is_empty() {
            return Err(CoreError::InvalidInput(
                "At least one file is required".to_string(),
            ));
        }

        let submitted_at = self.clock.now();
        let file_count = file_names.len();

        for attempt in 1..=MAX_ID_ATTEMPTS {
            let id = self.ids.generate_id(submitted_at);
            let job = Job::new(id.clone(), submitted_at, file_names.clone());

            if self.store.insert(job).await {
                tracing::info!(job_id = %id, file_count, "Scan job submitted");
                return Ok(SubmitReceipt {
                    job_id: id,
                    message: SUBMIT_MESSAGE.to_string(),
                });
            }

            tracing::warn!(job_id = %id, attempt, "Job id collision, regenerating");
        }

        Err(CoreError::Internal(format!(
            "Could not allocate a unique job id after {MAX_ID_ATTEMPTS} attempts"
        )))
    }

    /// Current stage, progress and ETA of `job_id`.
    pub async fn status(&self, job_id: &str) -> Result<StatusReport, CoreError> {
        let job = self.find(job_id).await?;
        let report = stage::status_report(self.schedule.as_ref(), job_id, self.elapsed(&job));

        if report.stage != job.last_stage {
            self.store.record_stage(job_id, report.stage).await;
            tracing::info!(
                job_id,
                from = %job.last_stage,
                to = %report.stage,
                "Scan job stage changed",
            );
        }

        Ok(report)
    }

    /// Diagnostic payload of a completed job.
    pub async fn results(&self, job_id: &str) -> Result<ScanResult, CoreError> {
        let job = self.find(job_id).await?;
        let snapshot = self.schedule.resolve(job_id, self.elapsed(&job));

        match snapshot.stage {
            Stage::Completed => Ok(selector::select(job_id)),
            Stage::Error => Err(CoreError::ProcessingFailed(
                self.schedule.error_message(job_id),
            )),
            stage => Err(CoreError::NotReady {
                id: job_id.to_string(),
                stage,
            }),
        }
    }

    pub async fn job_count(&self) -> usize {
        self.store.len().await
    }

    async fn find(&self, job_id: &str) -> Result<Job, CoreError> {
        self.store
            .get(job_id)
            .await
            .ok_or_else(|| CoreError::NotFound {
                entity: JOB_ENTITY,
                id: job_id.to_string(),
            })
    }

    fn elapsed(&self, job: &Job) -> f64 {
        elapsed_secs(job.submitted_at, self.clock.now())
    }
}

/// In-process polling straight against the service.
#[async_trait]
impl StatusSource for JobService {
    type Error = CoreError;

    async fn status(&self, job_id: &str) -> Result<StatusReport, CoreError> {
        JobService::status(self, job_id).await
    }

    async fn results(&self, job_id: &str) -> Result<ScanResult, CoreError> {
        JobService::results(self, job_id).await
    }
}
