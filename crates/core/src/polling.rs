//! Client-side status poller.
//!
//! Re-issues Status on a fixed cadence until a terminal stage is observed,
//! then fetches Results exactly once. The poll runs as a tokio task bound to
//! a [`PollHandle`]; dropping the handle cancels the task, so a view that
//! goes away stops polling with it. In-flight calls are allowed to finish.
//!
//! Transport failures end the poll and are returned to the caller. There is
//! no automatic retry; surfacing the error lets the user retry manually.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::scan::{ScanResult, Stage, StatusReport};

pub use tokio_util::sync::CancellationToken;

/// Default delay between Status calls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2_500);

/// Anything that can answer Status and Results for a job.
#[async_trait]
pub trait StatusSource: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn status(&self, job_id: &str) -> Result<StatusReport, Self::Error>;

    async fn results(&self, job_id: &str) -> Result<ScanResult, Self::Error>;
}

/// How a poll ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The job completed and its results were fetched.
    Completed(ScanResult),
    /// The job reached the `error` stage.
    Failed(StatusReport),
    /// The poll was cancelled before it could finish.
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum PollError<E: std::error::Error + 'static> {
    #[error("status transport failed: {0}")]
    Transport(#[source] E),

    #[error("poll task ended abnormally: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Repeating Status caller with a fixed interval.
#[derive(Debug, Clone, Copy)]
pub struct Poller {
    interval: Duration,
}

impl Default for Poller {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Poll `job_id` until terminal or until `cancel` fires.
    ///
    /// The first Status call is issued immediately. `on_update` sees every
    /// report, including the terminal one.
    pub async fn run<S, F>(
        &self,
        source: &S,
        job_id: &str,
        cancel: &CancellationToken,
        mut on_update: F,
    ) -> Result<PollOutcome, PollError<S::Error>>
    where
        S: StatusSource + ?Sized,
        F: FnMut(&StatusReport) + Send,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(job_id, "Poll cancelled");
                    return Ok(PollOutcome::Cancelled);
                }
                _ = ticker.tick() => {}
            }

            let report = source
                .status(job_id)
                .await
                .map_err(PollError::Transport)?;

            tracing::debug!(
                job_id,
                stage = %report.stage,
                progress = report.progress,
                eta_seconds = ?report.eta_seconds,
                "Polled job status",
            );
            on_update(&report);

            // The in-flight call may finish, but nothing new starts after cancel.
            if cancel.is_cancelled() {
                tracing::debug!(job_id, stage = %report.stage, "Poll cancelled mid-call");
                return Ok(PollOutcome::Cancelled);
            }

            match report.stage {
                Stage::Completed => {
                    let result = source
                        .results(job_id)
                        .await
                        .map_err(PollError::Transport)?;
                    tracing::info!(job_id, "Poll finished: job completed");
                    return Ok(PollOutcome::Completed(result));
                }
                Stage::Error => {
                    tracing::info!(
                        job_id,
                        error = ?report.error_message,
                        "Poll finished: job failed",
                    );
                    return Ok(PollOutcome::Failed(report));
                }
                _ => {}
            }
        }
    }

    /// Start polling on a background task.
    ///
    /// The returned handle publishes every report on a watch channel and
    /// cancels the task when dropped.
    pub fn spawn<S>(self, source: Arc<S>, job_id: impl Into<String>) -> PollHandle<S::Error>
    where
        S: StatusSource + 'static,
    {
        let job_id = job_id.into();
        let cancel = CancellationToken::new();
        let (tx, rx) = watch::channel(None);

        let task_cancel = cancel.clone();
        let task = tokio::spawn(async move {
            self.run(source.as_ref(), &job_id, &task_cancel, |report| {
                tx.send_replace(Some(report.clone()));
            })
            .await
        });

        PollHandle {
            cancel,
            updates: rx,
            task: Some(task),
        }
    }
}

/// Owner of a spawned poll. Dropping it stops further Status calls.
pub struct PollHandle<E: std::error::Error + 'static> {
    cancel: CancellationToken,
    updates: watch::Receiver<Option<StatusReport>>,
    task: Option<JoinHandle<Result<PollOutcome, PollError<E>>>>,
}

impl<E: std::error::Error + Send + 'static> PollHandle<E> {
    /// Latest report observed, if any call has returned yet.
    pub fn latest(&self) -> Option<StatusReport> {
        self.updates.borrow().clone()
    }

    /// A receiver that is notified on every new report.
    pub fn subscribe(&self) -> watch::Receiver<Option<StatusReport>> {
        self.updates.clone()
    }

    /// Request cancellation without waiting for the task.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the poll to finish.
    pub async fn outcome(mut self) -> Result<PollOutcome, PollError<E>> {
        match self.task.take() {
            Some(task) => task.await?,
            None => Ok(PollOutcome::Cancelled),
        }
    }
}

impl<E: std::error::Error + 'static> Drop for PollHandle<E> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
