//! Commitment storage trait.

use crate::StoreError;
use vetting_types::{CandidateId, Commitment, JurorAddress, SessionId};

pub trait CommitmentStore {
    /// Insert a commitment. Fails with `Duplicate` if one already exists for
    /// (session, candidate, juror); the stored commitment is never replaced.
    fn insert_commitment(&self, commitment: &Commitment) -> Result<(), StoreError>;

    fn get_commitment(
        &self,
        session: SessionId,
        candidate: CandidateId,
        juror: &JurorAddress,
    ) -> Result<Option<Commitment>, StoreError>;

    /// All commitments for a candidate, in juror key order.
    fn commitments_for(
        &self,
        session: SessionId,
        candidate: CandidateId,
    ) -> Result<Vec<Commitment>, StoreError>;
}
