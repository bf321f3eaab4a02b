//! Reveal validation.

use vetting_crypto::verify_commitment;
use vetting_store::{StoreError, VettingStore};
use vetting_types::{CandidateId, JurorAddress, Phase, Reveal, Tally, Timestamp, VettingSession};

use crate::params::VettingParams;
use crate::phase::PhaseClock;
use crate::VettingError;

/// A juror's opening of an earlier commitment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealSubmission {
    pub candidate: CandidateId,
    pub decision: bool,
    pub secret: String,
    pub evidence_ref: String,
    pub findings: String,
}

impl RevealSubmission {
    pub fn new(candidate: CandidateId, decision: bool, secret: impl Into<String>) -> Self {
        Self {
            candidate,
            decision,
            secret: secret.into(),
            evidence_ref: String::new(),
            findings: String::new(),
        }
    }

    pub fn with_evidence(mut self, evidence_ref: impl Into<String>) -> Self {
        self.evidence_ref = evidence_ref.into();
        self
    }

    pub fn with_findings(mut self, findings: impl Into<String>) -> Self {
        self.findings = findings.into();
        self
    }
}

/// Accepts a reveal only if it opens the stored commitment.
///
/// A rejected reveal leaves no trace: the tally and the reveal set change
/// together or not at all.
pub struct RevealValidator;

impl RevealValidator {
    pub fn submit<S: VettingStore + ?Sized>(
        &self,
        store: &S,
        session: &VettingSession,
        params: &VettingParams,
        juror: &JurorAddress,
        submission: RevealSubmission,
        now: Timestamp,
    ) -> Result<(Reveal, Tally), VettingError> {
        let candidate = submission.candidate;
        if !now.within(session.commit_end, session.reveal_end) {
            return Err(VettingError::PhaseMismatch {
                session: session.id,
                expected: Phase::Reveal,
                actual: PhaseClock::derive(session, now),
            });
        }
        if !session.has_candidate(candidate) {
            return Err(VettingError::UnknownCandidate {
                session: session.id,
                candidate,
            });
        }
        if !session.is_juror(juror) {
            return Err(VettingError::NotAJuror(juror.clone()));
        }
        if submission.findings.len() > params.max_findings_len {
            return Err(VettingError::FindingsTooLong {
                len: submission.findings.len(),
                max: params.max_findings_len,
            });
        }
        if submission.evidence_ref.len() > params.max_evidence_ref_len {
            return Err(VettingError::EvidenceRefTooLong {
                len: submission.evidence_ref.len(),
                max: params.max_evidence_ref_len,
            });
        }

        let Some(commitment) = store.get_commitment(session.id, candidate, juror)? else {
            return Err(VettingError::NoCommitment {
                candidate,
                juror: juror.clone(),
            });
        };
        if store.get_reveal(session.id, candidate, juror)?.is_some() {
            return Err(VettingError::AlreadyRevealed {
                candidate,
                juror: juror.clone(),
            });
        }
        if !verify_commitment(
            session.scheme,
            &commitment.hash,
            submission.decision,
            &submission.secret,
            juror,
        ) {
            return Err(VettingError::HashMismatch {
                candidate,
                juror: juror.clone(),
            });
        }

        let reveal = Reveal {
            session: session.id,
            candidate,
            juror: juror.clone(),
            decision: submission.decision,
            evidence_ref: submission.evidence_ref,
            findings: submission.findings,
            revealed_at: now,
        };
        let tally = store.record_reveal(&reveal).map_err(|e| match e {
            StoreError::Duplicate(_) => VettingError::AlreadyRevealed {
                candidate,
                juror: juror.clone(),
            },
            StoreError::Sealed(id) => VettingError::PhaseMismatch {
                session: id,
                expected: Phase::Reveal,
                actual: Phase::Finalized,
            },
            other => other.into(),
        })?;
        Ok((reveal, tally))
    }

    pub fn has_revealed<S: VettingStore + ?Sized>(
        &self,
        store: &S,
        session: &VettingSession,
        candidate: CandidateId,
        juror: &JurorAddress,
    ) -> Result<bool, VettingError> {
        Ok(store.get_reveal(session.id, candidate, juror)?.is_some())
    }
}
