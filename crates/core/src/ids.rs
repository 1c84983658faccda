//! Job identifier generation.
//!
//! Identifiers combine the submission timestamp with a random base-36
//! suffix. The provider is a trait so tests can hand out predictable ids
//! (including ones carrying the error marker).

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

use crate::types::{JobId, Timestamp};

/// Prefix shared by every generated scan id.
pub const SCAN_ID_PREFIX: &str = "scan";

/// Length of the random base-36 suffix.
pub const SCAN_ID_SUFFIX_LEN: usize = 9;

const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Produces new job identifiers.
pub trait IdProvider: Send + Sync {
    /// Generate an identifier for a job submitted at `now`.
    fn generate_id(&self, now: Timestamp) -> JobId;
}

/// Production provider: `scan-{unix_millis}-{9 random base-36 chars}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanIdProvider;

impl IdProvider for ScanIdProvider {
    fn generate_id(&self, now: Timestamp) -> JobId {
        let mut rng = rand::rng();
        let suffix: String = (0..SCAN_ID_SUFFIX_LEN)
            .map(|_| BASE36_ALPHABET[rng.random_range(0..BASE36_ALPHABET.len())] as char)
            .collect();
        format!("{SCAN_ID_PREFIX}-{}-{suffix}", now.timestamp_millis())
    }
}

/// Deterministic provider yielding `{prefix}-1`, `{prefix}-2`, ...
#[derive(Debug)]
pub struct SequenceIdProvider {
    prefix: String,
    next: AtomicU64,
}

impl SequenceIdProvider {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdProvider for SequenceIdProvider {
    fn generate_id(&self, _now: Timestamp) -> JobId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn scan_id_has_prefix_timestamp_and_suffix() {
        let now = Utc.timestamp_millis_opt(1_718_000_000_123).unwrap();
        let id = ScanIdProvider.generate_id(now);

        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], SCAN_ID_PREFIX);
        assert_eq!(parts[1], "1718000000123");
        assert_eq!(parts[2].len(), SCAN_ID_SUFFIX_LEN);
        assert!(parts[2]
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
    }

    #[test]
    fn scan_ids_differ_within_the_same_millisecond() {
        let now = Utc::now();
        let a = ScanIdProvider.generate_id(now);
        let b = ScanIdProvider.generate_id(now);
        assert_ne!(a, b);
    }

    #[test]
    fn sequence_provider_counts_up() {
        let ids = SequenceIdProvider::new("scan-error");
        let now = Utc::now();
        assert_eq!(ids.generate_id(now), "scan-error-1");
        assert_eq!(ids.generate_id(now), "scan-error-2");
    }
}
