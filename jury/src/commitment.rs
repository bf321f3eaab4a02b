//! Commitment recording.

use vetting_store::{StoreError, VettingStore};
use vetting_types::{
    CandidateId, CommitHash, Commitment, JurorAddress, Phase, Timestamp, VettingSession,
};

use crate::phase::PhaseClock;
use crate::VettingError;

/// Records one hiding commitment per (session, candidate, juror).
///
/// Callers are expected to have checked the observable phase; the book
/// re-checks the commit window against `now` on its own as well.
pub struct CommitmentBook;

impl CommitmentBook {
    pub fn submit<S: VettingStore + ?Sized>(
        &self,
        store: &S,
        session: &VettingSession,
        candidate: CandidateId,
        juror: &JurorAddress,
        hash: CommitHash,
        now: Timestamp,
    ) -> Result<Commitment, VettingError> {
        if !now.within(session.commit_start, session.commit_end) {
            return Err(VettingError::PhaseMismatch {
                session: session.id,
                expected: Phase::Commit,
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
        if session.stake_amount > 0 && store.get_stake(session.id, juror)?.is_none() {
            return Err(VettingError::StakeRequired(juror.clone()));
        }

        let commitment = Commitment {
            session: session.id,
            candidate,
            juror: juror.clone(),
            hash,
            committed_at: now,
        };
        store.insert_commitment(&commitment).map_err(|e| match e {
            StoreError::Duplicate(_) => VettingError::DuplicateCommitment {
                candidate,
                juror: juror.clone(),
            },
            other => other.into(),
        })?;
        Ok(commitment)
    }

    pub fn has_committed<S: VettingStore + ?Sized>(
        &self,
        store: &S,
        session: &VettingSession,
        candidate: CandidateId,
        juror: &JurorAddress,
    ) -> Result<bool, VettingError> {
        Ok(store.get_commitment(session.id, candidate, juror)?.is_some())
    }
}
