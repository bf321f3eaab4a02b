//! Protocol parameters.

use serde::{Deserialize, Serialize};
use vetting_types::{ApprovalThreshold, CommitScheme};

use crate::VettingError;

/// Smallest allowed jury. Jury sizes are also required to be odd.
pub const MIN_JURY_SIZE: u32 = 5;

/// Padding added in front of the commit window so the oracle callback can
/// land before it closes.
pub const ORACLE_LATENCY_BUFFER_SECS: u64 = 300;

pub const MAX_FINDINGS_LEN: usize = 2_000;
pub const MAX_EVIDENCE_REF_LEN: usize = 256;

/// Basis-point denominator for approval thresholds.
pub const BPS_DENOMINATOR: u32 = 10_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VettingParams {
    pub min_jury_size: u32,
    /// Maximum expected oracle callback latency, added to every commit window.
    pub oracle_latency_buffer_secs: u64,
    pub min_commit_duration_secs: u64,
    pub min_reveal_duration_secs: u64,
    /// Limit on a reveal's free-text findings, in bytes.
    pub max_findings_len: usize,
    pub max_evidence_ref_len: usize,
    /// Threshold for sessions created without an explicit one.
    pub default_threshold: ApprovalThreshold,
    /// Hash scheme for sessions created without an explicit one.
    pub default_scheme: CommitScheme,
}

impl Default for VettingParams {
    fn default() -> Self {
        Self {
            min_jury_size: MIN_JURY_SIZE,
            oracle_latency_buffer_secs: ORACLE_LATENCY_BUFFER_SECS,
            min_commit_duration_secs: 60,
            min_reveal_duration_secs: 60,
            max_findings_len: MAX_FINDINGS_LEN,
            max_evidence_ref_len: MAX_EVIDENCE_REF_LEN,
            default_threshold: ApprovalThreshold::StrictMajority,
            default_scheme: CommitScheme::Blake2b256,
        }
    }
}

impl VettingParams {
    /// Short windows for local networks and tests.
    pub fn dev_defaults() -> Self {
        Self {
            oracle_latency_buffer_secs: 10,
            min_commit_duration_secs: 1,
            min_reveal_duration_secs: 1,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), VettingError> {
        if self.min_jury_size < MIN_JURY_SIZE || self.min_jury_size % 2 == 0 {
            return Err(VettingError::InvalidJurySize {
                size: self.min_jury_size,
                min: MIN_JURY_SIZE,
            });
        }
        if self.min_commit_duration_secs == 0 || self.min_reveal_duration_secs == 0 {
            return Err(VettingError::InvalidSchedule(
                "minimum window durations must be non-zero".into(),
            ));
        }
        validate_threshold(self.default_threshold)
    }
}

/// Reject basis-point thresholds outside `(0, 10000]`.
pub fn validate_threshold(threshold: ApprovalThreshold) -> Result<(), VettingError> {
    match threshold {
        ApprovalThreshold::StrictMajority => Ok(()),
        ApprovalThreshold::AtLeastBps(bps) if bps > 0 && bps <= BPS_DENOMINATOR => Ok(()),
        ApprovalThreshold::AtLeastBps(bps) => Err(VettingError::InvalidThreshold(bps)),
    }
}
