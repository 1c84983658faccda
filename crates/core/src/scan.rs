//! Scan job payload types shared by the service, the HTTP layer and clients.

use serde::{Deserialize, Serialize};

use crate::types::JobId;

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Processing phase of a scan job.
///
/// The normal path is `Queued -> Normalizing -> Compressing -> Analyzing ->
/// Completed`. `Error` is an absorbing state reachable from any non-terminal
/// stage. Variant order matches the normal path, so `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Queued,
    Normalizing,
    Compressing,
    Analyzing,
    Completed,
    Error,
}

impl Stage {
    /// Normal-path stages in order.
    pub const PIPELINE: [Stage; 5] = [
        Stage::Queued,
        Stage::Normalizing,
        Stage::Compressing,
        Stage::Analyzing,
        Stage::Completed,
    ];

    /// `true` for `Completed` and `Error`; no transition leaves these.
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Completed | Stage::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Queued => "queued",
            Stage::Normalizing => "normalizing",
            Stage::Compressing => "compressing",
            Stage::Analyzing => "analyzing",
            Stage::Completed => "completed",
            Stage::Error => "error",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Operation payloads
// ---------------------------------------------------------------------------

/// Returned by a successful submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub job_id: JobId,
    pub message: String,
}

/// Point-in-time view of a job's progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub job_id: JobId,
    pub stage: Stage,
    /// Fraction complete in `[0.0, 1.0]`.
    pub progress: f64,
    /// Whole seconds until completion; `None` once terminal.
    pub eta_seconds: Option<u32>,
    /// Human-readable failure reason, set only for `Stage::Error`.
    pub error_message: Option<String>,
}

/// Imaging modality of a processed scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modality {
    #[serde(rename = "MRI")]
    Mri,
    #[serde(rename = "CT")]
    Ct,
}

impl Modality {
    /// Number of slices a scan of this modality is processed into.
    pub fn slice_count(self) -> u32 {
        match self {
            Modality::Mri => 256,
            Modality::Ct => 512,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanMetadata {
    pub modality: Modality,
    pub slices_processed: u32,
    pub compression_ratio: f64,
}

/// Terminal diagnostic payload of a completed job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub job_id: JobId,
    pub diagnosis_summary: String,
    /// Model confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    pub key_findings: Vec<String>,
    pub preview_reference: String,
    pub metadata: ScanMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_serializes_lowercase() {
        let json = serde_json::to_string(&Stage::Normalizing).unwrap();
        assert_eq!(json, "\"normalizing\"");
        let back: Stage = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(back, Stage::Completed);
    }

    #[test]
    fn only_completed_and_error_are_terminal() {
        for stage in &Stage::PIPELINE[..4] {
            assert!(!stage.is_terminal(), "{stage} should not be terminal");
        }
        assert!(Stage::Completed.is_terminal());
        assert!(Stage::Error.is_terminal());
    }

    #[test]
    fn pipeline_order_matches_ord() {
        assert!(Stage::PIPELINE.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn modality_uses_uppercase_names() {
        assert_eq!(serde_json::to_string(&Modality::Mri).unwrap(), "\"MRI\"");
        assert_eq!(serde_json::to_string(&Modality::Ct).unwrap(), "\"CT\"");
    }

    #[test]
    fn status_report_eta_serializes_as_null_when_absent() {
        let report = StatusReport {
            job_id: "scan-1".into(),
            stage: Stage::Completed,
            progress: 1.0,
            eta_seconds: None,
            error_message: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["eta_seconds"].is_null());
        assert_eq!(json["stage"], "completed");
    }
}
