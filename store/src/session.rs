//! Session storage trait.

use crate::StoreError;
use vetting_types::{SessionId, VettingSession};

/// Storage for session records.
pub trait SessionStore {
    /// Allocate the next session id (1, 2, 3, ...) and store the session
    /// `build` returns for it, in one atomic step. Nothing is allocated if
    /// the write fails.
    fn insert_next_session(
        &self,
        build: &dyn Fn(SessionId) -> VettingSession,
    ) -> Result<VettingSession, StoreError>;

    /// Number of session ids allocated so far.
    fn session_count(&self) -> Result<u64, StoreError>;

    fn get_session(&self, id: SessionId) -> Result<Option<VettingSession>, StoreError>;

    /// All stored session ids in ascending order.
    fn list_sessions(&self) -> Result<Vec<SessionId>, StoreError>;

    /// Replace `expected` with `new` only if the stored record still equals
    /// `expected`. Fails with `Conflict` otherwise, `NotFound` if absent.
    fn compare_and_swap_session(
        &self,
        expected: &VettingSession,
        new: &VettingSession,
    ) -> Result<(), StoreError>;
}
