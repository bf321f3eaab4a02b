//! The vetting session record and its lifecycle phases.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{CandidateId, CommitScheme, ElectionId, JurorAddress, RequestId, SessionId, Timestamp};

/// The forward-only phases of a vetting session.
///
/// Declaration order is lifecycle order, so `Ord` can be used to enforce
/// monotonicity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the randomness oracle to deliver the jury.
    JurySelection,
    /// Jurors stake and submit hiding commitments.
    Commit,
    /// Jurors open their commitments.
    Reveal,
    /// Terminal: no further commits or reveals.
    Finalized,
}

impl Phase {
    /// Numeric code (0..=3), the encoding on-chain tooling reports.
    pub fn code(&self) -> u8 {
        match self {
            Self::JurySelection => 0,
            Self::Commit => 1,
            Self::Reveal => 2,
            Self::Finalized => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::JurySelection => "Jury Selection",
            Self::Commit => "Commit",
            Self::Reveal => "Reveal",
            Self::Finalized => "Finalized",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How many approvals a candidate needs to pass vetting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalThreshold {
    /// `approvals * 2 > total_reveals`. An exact tie fails.
    #[default]
    StrictMajority,
    /// `approvals / total_reveals >= bps / 10_000`.
    AtLeastBps(u32),
}

/// A vetting session: one jury reviewing a fixed batch of candidates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VettingSession {
    pub id: SessionId,
    pub election_id: ElectionId,
    /// The account that created the session; only it may request the jury,
    /// finalize or abandon.
    pub creator: JurorAddress,
    /// Candidates under review, fixed at creation.
    pub candidate_ids: Vec<CandidateId>,
    /// Configured jury size (odd, at least the protocol minimum).
    pub jury_size: u32,
    /// Populated once by the oracle callback; empty until then.
    pub jurors: Vec<JurorAddress>,
    pub commit_start: Timestamp,
    pub commit_end: Timestamp,
    pub reveal_end: Timestamp,
    /// Minimum stake each juror must post before committing (0 disables staking).
    pub stake_amount: u128,
    /// Seal automatically once the reveal window has closed.
    pub auto_finalize: bool,
    pub threshold: ApprovalThreshold,
    pub scheme: CommitScheme,
    /// Outstanding oracle request, if jury selection has been requested.
    pub pending_request: Option<RequestId>,
    /// Set when the session is sealed and its results cached.
    pub finalized_at: Option<Timestamp>,
    /// Set when the creator gives up on a session whose jury never arrived.
    pub abandoned: bool,
}

impl VettingSession {
    pub fn has_jury(&self) -> bool {
        !self.jurors.is_empty()
    }

    pub fn is_juror(&self, who: &JurorAddress) -> bool {
        self.jurors.contains(who)
    }

    pub fn has_candidate(&self, candidate: CandidateId) -> bool {
        self.candidate_ids.contains(&candidate)
    }

    pub fn is_sealed(&self) -> bool {
        self.finalized_at.is_some()
    }
}
