//! Per-juror records and derived results.

use serde::{Deserialize, Serialize};

use crate::{CandidateId, CommitHash, JurorAddress, SessionId, Timestamp};

/// A juror's hiding commitment for one candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    pub session: SessionId,
    pub candidate: CandidateId,
    pub juror: JurorAddress,
    pub hash: CommitHash,
    pub committed_at: Timestamp,
}

/// An accepted opening of a commitment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reveal {
    pub session: SessionId,
    pub candidate: CandidateId,
    pub juror: JurorAddress,
    /// `true` approves the candidate.
    pub decision: bool,
    /// Opaque pointer to supporting material, stored verbatim.
    pub evidence_ref: String,
    pub findings: String,
    pub revealed_at: Timestamp,
}

/// A juror's stake for a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRecord {
    pub session: SessionId,
    pub juror: JurorAddress,
    pub amount: u128,
    pub staked_at: Timestamp,
}

/// Running approve/reject counts for one candidate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub approvals: u64,
    pub rejections: u64,
}

impl Tally {
    pub fn total(&self) -> u64 {
        self.approvals + self.rejections
    }

    /// Count one more accepted reveal.
    pub fn record(&mut self, decision: bool) {
        if decision {
            self.approvals += 1;
        } else {
            self.rejections += 1;
        }
    }
}

/// The verdict for one candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VettingResult {
    pub session: SessionId,
    pub candidate: CandidateId,
    pub approvals: u64,
    pub rejections: u64,
    pub total_reveals: u64,
    /// `approvals * 100 / total_reveals`, rounded down; 0 with no reveals.
    pub approval_percentage: u64,
    pub approved: bool,
}
