use thiserror::Error;
use vetting_oracle::OracleError;
use vetting_store::StoreError;
use vetting_types::{CandidateId, JurorAddress, Phase, RequestId, SessionId};

#[derive(Debug, Error)]
pub enum VettingError {
    #[error("{session} is in phase {actual}, operation requires {expected}")]
    PhaseMismatch {
        session: SessionId,
        expected: Phase,
        actual: Phase,
    },

    #[error("{0} is not a juror of this session")]
    NotAJuror(JurorAddress),

    #[error("{juror} has already committed for {candidate}")]
    DuplicateCommitment {
        candidate: CandidateId,
        juror: JurorAddress,
    },

    #[error("{juror} has already revealed for {candidate}")]
    AlreadyRevealed {
        candidate: CandidateId,
        juror: JurorAddress,
    },

    #[error("{juror} has no commitment for {candidate}")]
    NoCommitment {
        candidate: CandidateId,
        juror: JurorAddress,
    },

    #[error("reveal by {juror} for {candidate} does not match the commitment")]
    HashMismatch {
        candidate: CandidateId,
        juror: JurorAddress,
    },

    #[error("{0} not found")]
    SessionNotFound(SessionId),

    #[error("{candidate} is not under review in {session}")]
    UnknownCandidate {
        session: SessionId,
        candidate: CandidateId,
    },

    #[error("jury size {size} must be odd and at least {min}")]
    InvalidJurySize { size: u32, min: u32 },

    #[error("invalid candidate set: {0}")]
    InvalidCandidateSet(String),

    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("approval threshold {0} bps is outside (0, 10000]")]
    InvalidThreshold(u32),

    #[error("invalid jury set: {0}")]
    InvalidJurySet(String),

    #[error("{0} is not authorized for this session")]
    Unauthorized(JurorAddress),

    #[error("jury selection already requested for {0}")]
    SelectionAlreadyRequested(SessionId),

    #[error("{request} is not the outstanding oracle request for {session}")]
    UnexpectedOracleRequest {
        session: SessionId,
        request: RequestId,
    },

    #[error("{0} has expired without a jury")]
    SessionExpired(SessionId),

    #[error("{0} has not expired")]
    SessionNotExpired(SessionId),

    #[error("{0} is already finalized")]
    AlreadyFinalized(SessionId),

    #[error("{0} must stake before committing")]
    StakeRequired(JurorAddress),

    #[error("{0} has already staked")]
    AlreadyStaked(JurorAddress),

    #[error("insufficient stake: needed {needed}, provided {provided}")]
    InsufficientStake { needed: u128, provided: u128 },

    #[error("findings are {len} bytes, limit is {max}")]
    FindingsTooLong { len: usize, max: usize },

    #[error("evidence reference is {len} bytes, limit is {max}")]
    EvidenceRefTooLong { len: usize, max: usize },

    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl VettingError {
    /// Whether the same call can succeed later without changing its arguments.
    ///
    /// Only a phase mismatch qualifies: the caller waits for the right phase.
    /// Every other rejection is final for that call.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::PhaseMismatch { .. })
    }
}
