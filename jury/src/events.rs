//! Events emitted by the engine for the host to process.

use vetting_types::{
    CandidateId, ElectionId, JurorAddress, RequestId, SessionId, Timestamp, VettingResult,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VettingEvent {
    SessionCreated {
        session: SessionId,
        election: ElectionId,
        creator: JurorAddress,
        jury_size: u32,
        commit_end: Timestamp,
        reveal_end: Timestamp,
    },
    JurySelectionRequested {
        session: SessionId,
        request: RequestId,
    },
    JurorsSelected {
        session: SessionId,
        jurors: Vec<JurorAddress>,
    },
    JurorStaked {
        session: SessionId,
        juror: JurorAddress,
        amount: u128,
    },
    /// Carries no decision: commitments stay hidden until revealed.
    VoteCommitted {
        session: SessionId,
        candidate: CandidateId,
        juror: JurorAddress,
    },
    VoteRevealed {
        session: SessionId,
        candidate: CandidateId,
        juror: JurorAddress,
        decision: bool,
    },
    SessionFinalized {
        session: SessionId,
        results: Vec<VettingResult>,
    },
    SessionAbandoned {
        session: SessionId,
    },
}

impl VettingEvent {
    pub fn session(&self) -> SessionId {
        match self {
            Self::SessionCreated { session, .. }
            | Self::JurySelectionRequested { session, .. }
            | Self::JurorsSelected { session, .. }
            | Self::JurorStaked { session, .. }
            | Self::VoteCommitted { session, .. }
            | Self::VoteRevealed { session, .. }
            | Self::SessionFinalized { session, .. }
            | Self::SessionAbandoned { session } => *session,
        }
    }
}
