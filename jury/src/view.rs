//! Read-only snapshots for dashboards and tooling.

use serde::{Deserialize, Serialize};
use vetting_types::{
    ApprovalThreshold, CandidateId, CommitScheme, ElectionId, JurorAddress, Phase, RequestId,
    SessionId, Timestamp,
};

/// A session as seen at a given instant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub id: SessionId,
    pub election_id: ElectionId,
    pub creator: JurorAddress,
    pub candidate_ids: Vec<CandidateId>,
    pub jury_size: u32,
    pub jurors: Vec<JurorAddress>,
    pub commit_start: Timestamp,
    pub commit_end: Timestamp,
    pub reveal_end: Timestamp,
    pub stake_amount: u128,
    pub auto_finalize: bool,
    pub threshold: ApprovalThreshold,
    pub scheme: CommitScheme,
    pub pending_request: Option<RequestId>,
    pub phase: Phase,
    /// True exactly when `phase` is Finalized.
    pub is_finalized: bool,
    /// Results have been sealed and cached.
    pub is_sealed: bool,
    pub is_expired: bool,
}

/// One juror's participation for one candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurorReport {
    pub juror: JurorAddress,
    pub has_committed: bool,
    pub has_revealed: bool,
    /// Present only once revealed.
    pub decision: Option<bool>,
    pub evidence_ref: Option<String>,
    pub findings: Option<String>,
    pub revealed_at: Option<Timestamp>,
}
