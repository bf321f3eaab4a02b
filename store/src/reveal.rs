//! Reveal and running-tally storage trait.

use crate::StoreError;
use vetting_types::{CandidateId, JurorAddress, Reveal, SessionId, Tally};

pub trait RevealStore {
    /// Atomically insert a reveal and count it in the candidate's tally.
    ///
    /// Fails with `Duplicate` if the juror already revealed for this
    /// candidate, and with `Sealed` if the session was sealed in the meantime.
    /// On failure neither the reveal nor the tally is touched. Returns the
    /// tally after the increment.
    fn record_reveal(&self, reveal: &Reveal) -> Result<Tally, StoreError>;

    fn get_reveal(
        &self,
        session: SessionId,
        candidate: CandidateId,
        juror: &JurorAddress,
    ) -> Result<Option<Reveal>, StoreError>;

    /// All reveals for a candidate, in juror key order.
    fn reveals_for(&self, session: SessionId, candidate: CandidateId)
        -> Result<Vec<Reveal>, StoreError>;

    /// Running tally for a candidate (zero if nobody revealed).
    fn tally(&self, session: SessionId, candidate: CandidateId) -> Result<Tally, StoreError>;
}
