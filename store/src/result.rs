//! Sealing and cached-result storage trait.

use crate::StoreError;
use vetting_types::{CandidateId, SessionId, Tally, VettingResult, VettingSession};

pub trait ResultStore {
    /// Swap `expected` for `sealed` (which carries `finalized_at`) and, in the
    /// same atomic step, read the tally of every candidate.
    ///
    /// Once this returns no further reveal can be recorded for the session,
    /// so the returned tallies are final.
    fn seal_session(
        &self,
        expected: &VettingSession,
        sealed: &VettingSession,
    ) -> Result<Vec<(CandidateId, Tally)>, StoreError>;

    /// Cache a result. Fails with `Duplicate` if one is already cached.
    fn insert_result(&self, result: &VettingResult) -> Result<(), StoreError>;

    fn get_result(
        &self,
        session: SessionId,
        candidate: CandidateId,
    ) -> Result<Option<VettingResult>, StoreError>;
}
