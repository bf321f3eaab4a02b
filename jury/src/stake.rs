//! Juror stake intake.

use vetting_store::{StoreError, VettingStore};
use vetting_types::{CandidateId, JurorAddress, StakeRecord, Timestamp, VettingSession};

use crate::VettingError;

/// Records each juror's stake once per session.
///
/// Stake only gates commitment; what happens to the stake of jurors that never
/// reveal is settled outside the protocol (see [`StakeLedger::non_revealers`]).
pub struct StakeLedger;

impl StakeLedger {
    pub fn stake<S: VettingStore + ?Sized>(
        &self,
        store: &S,
        session: &VettingSession,
        juror: &JurorAddress,
        amount: u128,
        now: Timestamp,
    ) -> Result<StakeRecord, VettingError> {
        if !session.is_juror(juror) {
            return Err(VettingError::NotAJuror(juror.clone()));
        }
        if amount < session.stake_amount {
            return Err(VettingError::InsufficientStake {
                needed: session.stake_amount,
                provided: amount,
            });
        }
        let record = StakeRecord {
            session: session.id,
            juror: juror.clone(),
            amount,
            staked_at: now,
        };
        store.insert_stake(&record).map_err(|e| match e {
            StoreError::Duplicate(_) => VettingError::AlreadyStaked(juror.clone()),
            other => other.into(),
        })?;
        Ok(record)
    }

    /// Jurors that committed for `candidate` but never revealed.
    pub fn non_revealers<S: VettingStore + ?Sized>(
        &self,
        store: &S,
        session: &VettingSession,
        candidate: CandidateId,
    ) -> Result<Vec<JurorAddress>, VettingError> {
        let mut missing = Vec::new();
        for commitment in store.commitments_for(session.id, candidate)? {
            if store
                .get_reveal(session.id, candidate, &commitment.juror)?
                .is_none()
            {
                missing.push(commitment.juror);
            }
        }
        missing.sort();
        Ok(missing)
    }
}
