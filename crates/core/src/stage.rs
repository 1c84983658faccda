//! Elapsed-time stage schedule for scan jobs.
//!
//! Progress is a piecewise-linear function of the seconds elapsed since
//! submission over a fixed 60 second budget. The error-marker rule is
//! evaluated first and overrides the schedule.

use crate::scan::{Stage, StatusReport};

// ---------------------------------------------------------------------------
// Schedule constants
// ---------------------------------------------------------------------------

/// Total simulated processing time, in seconds.
pub const TOTAL_DURATION_SECS: f64 = 60.0;

/// Elapsed second at which each stage begins.
pub const NORMALIZING_STARTS_AT: f64 = 5.0;
pub const COMPRESSING_STARTS_AT: f64 = 15.0;
pub const ANALYZING_STARTS_AT: f64 = 35.0;
pub const COMPLETED_STARTS_AT: f64 = 55.0;

/// Progress reported while queued.
pub const QUEUED_PROGRESS: f64 = 0.05;
/// Progress at the end of each working stage.
pub const NORMALIZING_CEILING: f64 = 0.30;
pub const COMPRESSING_CEILING: f64 = 0.60;
pub const ANALYZING_CEILING: f64 = 0.95;

/// Substring whose presence in a job id forces the `error` stage.
pub const ERROR_MARKER: &str = "error";
/// Progress reported for an error-marked job.
pub const ERROR_PROGRESS: f64 = 0.5;
/// Message attached to an error-marked job's status.
pub const ERROR_MESSAGE: &str = "Processing failed: Unable to analyze scan data.";

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Stage, progress and ETA derived for one instant of a job's life.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageSnapshot {
    pub stage: Stage,
    pub progress: f64,
    pub eta_seconds: Option<u32>,
}

impl StageSnapshot {
    fn error() -> Self {
        Self {
            stage: Stage::Error,
            progress: ERROR_PROGRESS,
            eta_seconds: None,
        }
    }
}

/// Source of stage snapshots for the job service.
///
/// [`SimulatedSchedule`] is the only implementation today; a real processing
/// backend plugs in here without changing the service or its callers.
pub trait StageSchedule: Send + Sync {
    /// Resolve the snapshot for `job_id` after `elapsed_secs` seconds.
    fn resolve(&self, job_id: &str, elapsed_secs: f64) -> StageSnapshot;

    /// Failure reason to report alongside an `error` snapshot.
    fn error_message(&self, _job_id: &str) -> String {
        ERROR_MESSAGE.to_string()
    }
}

/// Time-driven schedule with id-based error injection.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedSchedule;

impl StageSchedule for SimulatedSchedule {
    fn resolve(&self, job_id: &str, elapsed_secs: f64) -> StageSnapshot {
        if is_error_marked(job_id) {
            return StageSnapshot::error();
        }
        compute(elapsed_secs)
    }
}

// ---------------------------------------------------------------------------
// Pure logic
// ---------------------------------------------------------------------------

/// `true` if `job_id` carries the reserved error marker.
pub fn is_error_marked(job_id: &str) -> bool {
    job_id.contains(ERROR_MARKER)
}

/// Map elapsed seconds to a stage snapshot.
///
/// Intervals are half-open: an elapsed value exactly on a breakpoint belongs
/// to the later stage. Negative or NaN input is treated as zero.
pub fn compute(elapsed_secs: f64) -> StageSnapshot {
    let e = if elapsed_secs.is_nan() || elapsed_secs < 0.0 {
        0.0
    } else {
        elapsed_secs
    };

    let (stage, progress) = if e < NORMALIZING_STARTS_AT {
        (Stage::Queued, QUEUED_PROGRESS)
    } else if e < COMPRESSING_STARTS_AT {
        let p = QUEUED_PROGRESS
            + (e - NORMALIZING_STARTS_AT) / (COMPRESSING_STARTS_AT - NORMALIZING_STARTS_AT)
                * (NORMALIZING_CEILING - QUEUED_PROGRESS);
        (Stage::Normalizing, p.min(NORMALIZING_CEILING))
    } else if e < ANALYZING_STARTS_AT {
        let p = NORMALIZING_CEILING
            + (e - COMPRESSING_STARTS_AT) / (ANALYZING_STARTS_AT - COMPRESSING_STARTS_AT)
                * (COMPRESSING_CEILING - NORMALIZING_CEILING);
        (Stage::Compressing, p.min(COMPRESSING_CEILING))
    } else if e < COMPLETED_STARTS_AT {
        let p = COMPRESSING_CEILING
            + (e - ANALYZING_STARTS_AT) / (COMPLETED_STARTS_AT - ANALYZING_STARTS_AT)
                * (ANALYZING_CEILING - COMPRESSING_CEILING);
        (Stage::Analyzing, p.min(ANALYZING_CEILING))
    } else {
        (Stage::Completed, 1.0)
    };

    let eta_seconds = if stage.is_terminal() {
        None
    } else {
        Some((TOTAL_DURATION_SECS - e).max(0.0).ceil() as u32)
    };

    StageSnapshot {
        stage,
        progress,
        eta_seconds,
    }
}

/// Build the full status report for `job_id` from a schedule.
pub fn status_report(
    schedule: &dyn StageSchedule,
    job_id: &str,
    elapsed_secs: f64,
) -> StatusReport {
    let snapshot = schedule.resolve(job_id, elapsed_secs);
    let error_message =
        (snapshot.stage == Stage::Error).then(|| schedule.error_message(job_id));

    StatusReport {
        job_id: job_id.to_string(),
        stage: snapshot.stage,
        progress: snapshot.progress,
        eta_seconds: snapshot.eta_seconds,
        error_message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // -- fixed points ---------------------------------------------------------

    #[test]
    fn starts_queued_with_full_eta() {
        let s = compute(0.0);
        assert_eq!(s.stage, Stage::Queued);
        assert!(approx(s.progress, 0.05));
        assert_eq!(s.eta_seconds, Some(60));
    }

    #[test]
    fn breakpoint_belongs_to_later_stage() {
        assert_eq!(compute(5.0).stage, Stage::Normalizing);
        assert_eq!(compute(35.0).stage, Stage::Analyzing);
        assert_eq!(compute(55.0).stage, Stage::Completed);

        let s = compute(15.0);
        assert_eq!(s.stage, Stage::Compressing);
        assert!(approx(s.progress, 0.30));
    }

    #[test]
    fn completed_at_sixty_has_no_eta() {
        let s = compute(60.0);
        assert_eq!(s.stage, Stage::Completed);
        assert!(approx(s.progress, 1.0));
        assert_eq!(s.eta_seconds, None);
    }

    #[test]
    fn midpoints_interpolate_linearly() {
        assert!(approx(compute(10.0).progress, 0.175));
        assert!(approx(compute(25.0).progress, 0.45));
        assert!(approx(compute(45.0).progress, 0.775));
    }

    #[test]
    fn eta_rounds_up_partial_seconds() {
        assert_eq!(compute(0.4).eta_seconds, Some(60));
        assert_eq!(compute(20.5).eta_seconds, Some(40));
        assert_eq!(compute(54.9).eta_seconds, Some(6));
    }

    #[test]
    fn negative_and_nan_elapsed_are_treated_as_zero() {
        assert_eq!(compute(-3.0), compute(0.0));
        assert_eq!(compute(f64::NAN), compute(0.0));
    }

    #[test]
    fn far_future_stays_completed() {
        let s = compute(86_400.0);
        assert_eq!(s.stage, Stage::Completed);
        assert_eq!(s.eta_seconds, None);
    }

    // -- properties -----------------------------------------------------------

    #[test]
    fn progress_is_bounded_and_non_decreasing() {
        let mut prev = 0.0;
        for step in 0..=6_500 {
            let e = step as f64 * 0.01;
            let p = compute(e).progress;
            assert!((0.0..=1.0).contains(&p), "progress {p} out of range at {e}");
            assert!(p >= prev, "progress regressed at {e}: {prev} -> {p}");
            prev = p;
        }
    }

    #[test]
    fn stages_advance_in_order_without_skips() {
        let mut seen = vec![compute(0.0).stage];
        for step in 1..=6_500 {
            let stage = compute(step as f64 * 0.01).stage;
            let last = *seen.last().unwrap();
            if stage != last {
                assert!(stage > last, "stage went backwards: {last} -> {stage}");
                seen.push(stage);
            }
        }
        assert_eq!(seen, Stage::PIPELINE.to_vec());
    }

    #[test]
    fn eta_is_non_increasing() {
        let mut prev = u32::MAX;
        for step in 0..5_500 {
            let eta = compute(step as f64 * 0.01).eta_seconds.unwrap();
            assert!(eta <= prev);
            prev = eta;
        }
    }

    // -- error injection ------------------------------------------------------

    #[test]
    fn error_marker_overrides_schedule_at_any_time() {
        for e in [0.0, 7.5, 30.0, 60.0, 1_000.0] {
            let s = SimulatedSchedule.resolve("scan-123-error", e);
            assert_eq!(s.stage, Stage::Error);
            assert!(approx(s.progress, 0.5));
            assert_eq!(s.eta_seconds, None);
        }
    }

    #[test]
    fn unmarked_ids_follow_schedule() {
        assert_eq!(SimulatedSchedule.resolve("scan-1-abc", 20.0), compute(20.0));
        assert!(!is_error_marked("scan-1-err0r"));
    }

    #[test]
    fn status_report_attaches_message_only_on_error() {
        let failed = status_report(&SimulatedSchedule, "scan-error-1", 0.0);
        assert_eq!(failed.stage, Stage::Error);
        assert_eq!(failed.error_message.as_deref(), Some(ERROR_MESSAGE));

        let ok = status_report(&SimulatedSchedule, "scan-1-abc", 0.0);
        assert_eq!(ok.stage, Stage::Queued);
        assert!(ok.error_message.is_none());
    }
}
