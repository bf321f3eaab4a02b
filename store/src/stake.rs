//! Juror stake storage trait.

use crate::StoreError;
use vetting_types::{JurorAddress, SessionId, StakeRecord};

pub trait StakeStore {
    /// Record a juror's stake. Fails with `Duplicate` on a second stake.
    fn insert_stake(&self, stake: &StakeRecord) -> Result<(), StoreError>;

    fn get_stake(
        &self,
        session: SessionId,
        juror: &JurorAddress,
    ) -> Result<Option<StakeRecord>, StoreError>;

    fn stakes_for(&self, session: SessionId) -> Result<Vec<StakeRecord>, StoreError>;
}
