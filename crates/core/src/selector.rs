//! Deterministic diagnostic result selection.
//!
//! A completed job's payload is derived from its identifier alone, so every
//! fetch for the same job returns the identical result. No clock and no
//! random source are consulted.

use crate::scan::{Modality, ScanMetadata, ScanResult};

/// Placeholder preview image served for every completed scan.
pub const PREVIEW_REFERENCE: &str = "/mock/compressed-image.png";

/// Lower bound of the reported compression ratio.
pub const BASE_COMPRESSION_RATIO: f64 = 0.15;

/// Number of distinct compression-ratio offsets (in hundredths).
pub const COMPRESSION_OFFSET_STEPS: u64 = 10;

/// Digits assumed when the id's last segment is empty (e.g. `scan-1-`).
const EMPTY_SEGMENT_INDEX_DIGITS: &str = "0";
const EMPTY_SEGMENT_RATIO_DIGITS: &str = "5";

/// One entry of the candidate diagnosis catalog.
#[derive(Debug, Clone, Copy)]
pub struct Diagnosis {
    pub summary: &'static str,
    pub confidence: f64,
    pub findings: &'static [&'static str],
}

/// Fixed catalog the selector picks from.
pub const DIAGNOSIS_CATALOG: [Diagnosis; 3] = [
    Diagnosis {
        summary: "No significant abnormalities detected. Brain structures appear normal with \
                  no evidence of mass effect, hemorrhage, or acute infarction. Ventricular \
                  system is within normal limits.",
        confidence: 0.92,
        findings: &[
            "Normal brain parenchyma",
            "No mass lesions identified",
            "Ventricular system normal",
            "No evidence of acute pathology",
        ],
    },
    Diagnosis {
        summary: "Mild cerebral atrophy noted with slight prominence of the sulci and \
                  ventricles. No acute intracranial abnormality. Small chronic lacunar infarct \
                  in the left basal ganglia region.",
        confidence: 0.87,
        findings: &[
            "Mild age-related cerebral atrophy",
            "Chronic lacunar infarct in left basal ganglia",
            "No acute hemorrhage or mass effect",
            "Ventricular prominence within normal limits",
        ],
    },
    Diagnosis {
        summary: "Focal area of increased T2 signal in the periventricular white matter, \
                  consistent with demyelinating changes. No mass effect or enhancement. \
                  Recommend clinical correlation.",
        confidence: 0.79,
        findings: &[
            "Periventricular white matter hyperintensities",
            "Possible demyelinating process",
            "No mass effect",
            "Clinical correlation recommended",
        ],
    },
];

/// Select the diagnostic payload for `job_id`.
pub fn select(job_id: &str) -> ScanResult {
    let diagnosis = &DIAGNOSIS_CATALOG[diagnosis_index(job_id)];
    let modality = modality_for(job_id);

    ScanResult {
        job_id: job_id.to_string(),
        diagnosis_summary: diagnosis.summary.to_string(),
        confidence: diagnosis.confidence,
        key_findings: diagnosis.findings.iter().map(|f| f.to_string()).collect(),
        preview_reference: PREVIEW_REFERENCE.to_string(),
        metadata: ScanMetadata {
            modality,
            slices_processed: modality.slice_count(),
            compression_ratio: compression_ratio_for(job_id),
        },
    }
}

/// Catalog index: base-36 value of the first two characters of the id's last
/// `-` segment, modulo the catalog size.
pub fn diagnosis_index(job_id: &str) -> usize {
    let seed =
        segment_seed(job_id, 2, EMPTY_SEGMENT_INDEX_DIGITS).unwrap_or_else(|| fnv1a(job_id));
    (seed % DIAGNOSIS_CATALOG.len() as u64) as usize
}

/// MRI when the id's final byte is even, CT otherwise.
pub fn modality_for(job_id: &str) -> Modality {
    match job_id.as_bytes().last() {
        Some(b) if b % 2 == 1 => Modality::Ct,
        _ => Modality::Mri,
    }
}

/// Compression ratio in `[0.15, 0.24]`, offset by the first character of the
/// id's last segment.
pub fn compression_ratio_for(job_id: &str) -> f64 {
    let seed = segment_seed(job_id, 1, EMPTY_SEGMENT_RATIO_DIGITS)
        .unwrap_or_else(|| fnv1a(job_id).rotate_right(17));
    let offset = seed % COMPRESSION_OFFSET_STEPS;
    BASE_COMPRESSION_RATIO + offset as f64 / 100.0
}

fn last_segment(job_id: &str) -> &str {
    job_id.rsplit('-').next().unwrap_or(job_id)
}

/// Base-36 prefix of the last segment, reading `empty_default` in place of
/// an empty segment.
fn segment_seed(job_id: &str, max_len: usize, empty_default: &str) -> Option<u64> {
    match last_segment(job_id) {
        "" => base36_prefix(empty_default, max_len),
        segment => base36_prefix(segment, max_len),
    }
}

/// Parse up to `max_len` leading base-36 digits. `None` if the first
/// character is not a base-36 digit.
fn base36_prefix(s: &str, max_len: usize) -> Option<u64> {
    let digits: Vec<u64> = s
        .chars()
        .take(max_len)
        .map_while(|c| c.to_digit(36).map(u64::from))
        .collect();
    if digits.is_empty() {
        return None;
    }
    Some(digits.iter().fold(0, |acc, d| acc * 36 + d))
}

/// 64-bit FNV-1a, used when an id has no base-36 prefix to decompose.
fn fnv1a(s: &str) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    s.bytes()
        .fold(OFFSET_BASIS, |hash, b| (hash ^ u64::from(b)).wrapping_mul(PRIME))
}
