//! Session creation requests and their validation.

use std::collections::HashSet;

use vetting_types::{
    ApprovalThreshold, CandidateId, CommitScheme, ElectionId, JurorAddress, SessionId, Timestamp,
    VettingSession,
};

use crate::params::{validate_threshold, VettingParams};
use crate::VettingError;

/// What a creator asks for when opening a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSpec {
    pub election_id: ElectionId,
    pub candidate_ids: Vec<CandidateId>,
    pub jury_size: u32,
    pub commit_duration_secs: u64,
    pub reveal_duration_secs: u64,
    pub stake_amount: u128,
    pub auto_finalize: bool,
    /// `None` uses [`VettingParams::default_threshold`].
    pub threshold: Option<ApprovalThreshold>,
    /// `None` uses [`VettingParams::default_scheme`].
    pub scheme: Option<CommitScheme>,
}

impl SessionSpec {
    /// One-hour commit and reveal windows, no stake, manual finalization.
    pub fn new(election_id: ElectionId, candidate_ids: Vec<CandidateId>, jury_size: u32) -> Self {
        Self {
            election_id,
            candidate_ids,
            jury_size,
            commit_duration_secs: 3_600,
            reveal_duration_secs: 3_600,
            stake_amount: 0,
            auto_finalize: false,
            threshold: None,
            scheme: None,
        }
    }

    pub fn with_durations(mut self, commit_secs: u64, reveal_secs: u64) -> Self {
        self.commit_duration_secs = commit_secs;
        self.reveal_duration_secs = reveal_secs;
        self
    }

    pub fn with_stake(mut self, amount: u128) -> Self {
        self.stake_amount = amount;
        self
    }

    pub fn with_threshold(mut self, threshold: ApprovalThreshold) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_scheme(mut self, scheme: CommitScheme) -> Self {
        self.scheme = Some(scheme);
        self
    }

    pub fn auto_finalize(mut self, enabled: bool) -> Self {
        self.auto_finalize = enabled;
        self
    }

    pub fn validate(&self, params: &VettingParams) -> Result<(), VettingError> {
        if self.jury_size < params.min_jury_size || self.jury_size % 2 == 0 {
            return Err(VettingError::InvalidJurySize {
                size: self.jury_size,
                min: params.min_jury_size,
            });
        }
        if self.candidate_ids.is_empty() {
            return Err(VettingError::InvalidCandidateSet(
                "at least one candidate is required".into(),
            ));
        }
        let mut seen = HashSet::with_capacity(self.candidate_ids.len());
        if let Some(dup) = self.candidate_ids.iter().find(|c| !seen.insert(**c)) {
            return Err(VettingError::InvalidCandidateSet(format!(
                "{dup} listed more than once"
            )));
        }
        if self.commit_duration_secs < params.min_commit_duration_secs {
            return Err(VettingError::InvalidSchedule(format!(
                "commit window {}s is shorter than {}s",
                self.commit_duration_secs, params.min_commit_duration_secs
            )));
        }
        if self.reveal_duration_secs < params.min_reveal_duration_secs {
            return Err(VettingError::InvalidSchedule(format!(
                "reveal window {}s is shorter than {}s",
                self.reveal_duration_secs, params.min_reveal_duration_secs
            )));
        }
        let span = params
            .oracle_latency_buffer_secs
            .checked_add(self.commit_duration_secs)
            .and_then(|s| s.checked_add(self.reveal_duration_secs));
        if span.is_none() {
            return Err(VettingError::InvalidSchedule("schedule overflows".into()));
        }
        validate_threshold(self.threshold.unwrap_or(params.default_threshold))
    }

    /// Validate the request and lay out its schedule.
    ///
    /// The commit window opens at `now` and is padded by the oracle latency
    /// buffer; the reveal window follows it directly.
    pub fn plan(
        &self,
        id: SessionId,
        creator: &JurorAddress,
        params: &VettingParams,
        now: Timestamp,
    ) -> Result<VettingSession, VettingError> {
        self.validate(params)?;
        let commit_end = now
            .plus(params.oracle_latency_buffer_secs)
            .plus(self.commit_duration_secs);
        let reveal_end = commit_end.plus(self.reveal_duration_secs);
        if reveal_end <= commit_end {
            return Err(VettingError::InvalidSchedule("schedule overflows".into()));
        }

        Ok(VettingSession {
            id,
            election_id: self.election_id,
            creator: creator.clone(),
            candidate_ids: self.candidate_ids.clone(),
            jury_size: self.jury_size,
            jurors: Vec::new(),
            commit_start: now,
            commit_end,
            reveal_end,
            stake_amount: self.stake_amount,
            auto_finalize: self.auto_finalize,
            threshold: self.threshold.unwrap_or(params.default_threshold),
            scheme: self.scheme.unwrap_or(params.default_scheme),
            pending_request: None,
            finalized_at: None,
            abandoned: false,
        })
    }
}
