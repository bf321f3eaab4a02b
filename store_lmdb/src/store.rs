//! LMDB implementation of the vetting store traits.
//!
//! Every check-then-write (id allocation, duplicate detection,
//! compare-and-swap, the reveal + tally pair, sealing) runs inside one write transaction, so LMDB's
//! single-writer lock makes it atomic.

use std::ops::Bound;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, RoTxn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use vetting_store::{
    CommitmentStore, ResultStore, RevealStore, SessionStore, StakeStore, StoreError,
};
use vetting_types::{
    CandidateId, Commitment, JurorAddress, Reveal, SessionId, StakeRecord, Tally, VettingResult,
    VettingSession,
};

use crate::keys::{candidate_key, increment_prefix, juror_key, session_key, stake_key};
use crate::LmdbError;

const SESSION_COUNTER_KEY: &[u8] = b"session_counter";

pub struct LmdbVettingStore {
    pub(crate) env: Arc<Env>,
    pub(crate) sessions_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
    pub(crate) commitments_db: Database<Bytes, Bytes>,
    pub(crate) reveals_db: Database<Bytes, Bytes>,
    pub(crate) tallies_db: Database<Bytes, Bytes>,
    pub(crate) stakes_db: Database<Bytes, Bytes>,
    pub(crate) results_db: Database<Bytes, Bytes>,
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, LmdbError> {
    Ok(bincode::serialize(value)?)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, LmdbError> {
    bincode::deserialize(bytes).map_err(|e| LmdbError::Corruption(e.to_string()))
}

fn get_decoded<T: DeserializeOwned>(
    db: &Database<Bytes, Bytes>,
    txn: &RoTxn,
    key: &[u8],
) -> Result<Option<T>, LmdbError> {
    match db.get(txn, key)? {
        Some(bytes) => Ok(Some(decode(bytes)?)),
        None => Ok(None),
    }
}

/// Prefix range-scan: decode every value whose key starts with `prefix`.
fn range_scan<T: DeserializeOwned>(
    db: &Database<Bytes, Bytes>,
    env: &Env,
    prefix: &[u8],
) -> Result<Vec<T>, LmdbError> {
    let rtxn = env.read_txn()?;
    let mut upper = prefix.to_vec();
    increment_prefix(&mut upper);
    let bounds = if upper.is_empty() {
        (Bound::Included(prefix), Bound::Unbounded)
    } else {
        (Bound::Included(prefix), Bound::Excluded(upper.as_slice()))
    };
    let mut results = Vec::new();
    for entry in db.range(&rtxn, &bounds)? {
        let (_key, value) = entry?;
        results.push(decode(value)?);
    }
    Ok(results)
}

impl LmdbVettingStore {
    fn read<T: DeserializeOwned>(
        &self,
        db: &Database<Bytes, Bytes>,
        key: &[u8],
    ) -> Result<Option<T>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(get_decoded(db, &rtxn, key)?)
    }

    /// Insert `value` under `key` unless the key is already present.
    fn insert_new<T: Serialize>(
        &self,
        db: &Database<Bytes, Bytes>,
        key: &[u8],
        value: &T,
        what: impl FnOnce() -> String,
    ) -> Result<(), StoreError> {
        let bytes = encode(value)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        if db.get(&wtxn, key).map_err(LmdbError::from)?.is_some() {
            return Err(StoreError::Duplicate(what()));
        }
        db.put(&mut wtxn, key, &bytes).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    /// Check `expected` against the stored session inside `wtxn` and stage
    /// `new` in its place.
    fn stage_swap(
        &self,
        wtxn: &mut heed::RwTxn,
        expected: &VettingSession,
        new: &VettingSession,
    ) -> Result<(), StoreError> {
        let key = session_key(expected.id);
        let current: VettingSession = get_decoded(&self.sessions_db, &*wtxn, &key)?
            .ok_or_else(|| StoreError::NotFound(expected.id.to_string()))?;
        if current != *expected {
            return Err(StoreError::Conflict(expected.id.to_string()));
        }
        let bytes = encode(new)?;
        self.sessions_db
            .put(wtxn, &key, &bytes)
            .map_err(LmdbError::from)?;
        Ok(())
    }
}

impl SessionStore for LmdbVettingStore {
    fn insert_next_session(
        &self,
        build: &dyn Fn(SessionId) -> VettingSession,
    ) -> Result<VettingSession, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let last: u64 = get_decoded(&self.meta_db, &wtxn, SESSION_COUNTER_KEY)?.unwrap_or(0);
        let id = SessionId::new(last + 1);
        let session = build(id);
        if session.id != id {
            return Err(StoreError::Conflict(format!(
                "built {} for allocated {id}",
                session.id
            )));
        }
        let key = session_key(id);
        if self
            .sessions_db
            .get(&wtxn, &key)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(StoreError::Duplicate(id.to_string()));
        }
        let session_bytes = encode(&session)?;
        let counter_bytes = encode(&id.get())?;
        self.sessions_db
            .put(&mut wtxn, &key, &session_bytes)
            .map_err(LmdbError::from)?;
        self.meta_db
            .put(&mut wtxn, SESSION_COUNTER_KEY, &counter_bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(session)
    }

    fn session_count(&self) -> Result<u64, StoreError> {
        Ok(self
            .read::<u64>(&self.meta_db, SESSION_COUNTER_KEY)?
            .unwrap_or(0))
    }

    fn get_session(&self, id: SessionId) -> Result<Option<VettingSession>, StoreError> {
        self.read(&self.sessions_db, &session_key(id))
    }

    fn list_sessions(&self) -> Result<Vec<SessionId>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut ids = Vec::new();
        for entry in self.sessions_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (key, _value) = entry.map_err(LmdbError::from)?;
            let raw: [u8; 8] = key
                .try_into()
                .map_err(|_| LmdbError::Corruption(format!("session key of {} bytes", key.len())))?;
            ids.push(SessionId::new(u64::from_be_bytes(raw)));
        }
        Ok(ids)
    }

    fn compare_and_swap_session(
        &self,
        expected: &VettingSession,
        new: &VettingSession,
    ) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.stage_swap(&mut wtxn, expected, new)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

impl CommitmentStore for LmdbVettingStore {
    fn insert_commitment(&self, commitment: &Commitment) -> Result<(), StoreError> {
        let key = juror_key(commitment.session, commitment.candidate, &commitment.juror);
        self.insert_new(&self.commitments_db, &key, commitment, || {
            format!(
                "commitment {}/{}/{}",
                commitment.session, commitment.candidate, commitment.juror
            )
        })
    }

    fn get_commitment(
        &self,
        session: SessionId,
        candidate: CandidateId,
        juror: &JurorAddress,
    ) -> Result<Option<Commitment>, StoreError> {
        self.read(&self.commitments_db, &juror_key(session, candidate, juror))
    }

    fn commitments_for(
        &self,
        session: SessionId,
        candidate: CandidateId,
    ) -> Result<Vec<Commitment>, StoreError> {
        Ok(range_scan(
            &self.commitments_db,
            &self.env,
            &candidate_key(session, candidate),
        )?)
    }
}

impl RevealStore for LmdbVettingStore {
    fn record_reveal(&self, reveal: &Reveal) -> Result<Tally, StoreError> {
        let key = juror_key(reveal.session, reveal.candidate, &reveal.juror);
        let tally_key = candidate_key(reveal.session, reveal.candidate);
        let reveal_bytes = encode(reveal)?;

        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let session: VettingSession =
            get_decoded(&self.sessions_db, &wtxn, &session_key(reveal.session))?
                .ok_or_else(|| StoreError::NotFound(reveal.session.to_string()))?;
        if session.is_sealed() {
            return Err(StoreError::Sealed(reveal.session));
        }
        if self
            .reveals_db
            .get(&wtxn, &key)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(StoreError::Duplicate(format!(
                "reveal {}/{}/{}",
                reveal.session, reveal.candidate, reveal.juror
            )));
        }
        let mut tally: Tally =
            get_decoded(&self.tallies_db, &wtxn, &tally_key)?.unwrap_or_default();
        tally.record(reveal.decision);
        let tally_bytes = encode(&tally)?;

        self.reveals_db
            .put(&mut wtxn, &key, &reveal_bytes)
            .map_err(LmdbError::from)?;
        self.tallies_db
            .put(&mut wtxn, &tally_key, &tally_bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(tally)
    }

    fn get_reveal(
        &self,
        session: SessionId,
        candidate: CandidateId,
        juror: &JurorAddress,
    ) -> Result<Option<Reveal>, StoreError> {
        self.read(&self.reveals_db, &juror_key(session, candidate, juror))
    }

    fn reveals_for(
        &self,
        session: SessionId,
        candidate: CandidateId,
    ) -> Result<Vec<Reveal>, StoreError> {
        Ok(range_scan(
            &self.reveals_db,
            &self.env,
            &candidate_key(session, candidate),
        )?)
    }

    fn tally(&self, session: SessionId, candidate: CandidateId) -> Result<Tally, StoreError> {
        Ok(self
            .read(&self.tallies_db, &candidate_key(session, candidate))?
            .unwrap_or_default())
    }
}

impl StakeStore for LmdbVettingStore {
    fn insert_stake(&self, stake: &StakeRecord) -> Result<(), StoreError> {
        let key = stake_key(stake.session, &stake.juror);
        self.insert_new(&self.stakes_db, &key, stake, || {
            format!("stake {}/{}", stake.session, stake.juror)
        })
    }

    fn get_stake(
        &self,
        session: SessionId,
        juror: &JurorAddress,
    ) -> Result<Option<StakeRecord>, StoreError> {
        self.read(&self.stakes_db, &stake_key(session, juror))
    }

    fn stakes_for(&self, session: SessionId) -> Result<Vec<StakeRecord>, StoreError> {
        Ok(range_scan(&self.stakes_db, &self.env, &session_key(session))?)
    }
}

impl ResultStore for LmdbVettingStore {
    fn seal_session(
        &self,
        expected: &VettingSession,
        sealed: &VettingSession,
    ) -> Result<Vec<(CandidateId, Tally)>, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.stage_swap(&mut wtxn, expected, sealed)?;
        let mut tallies = Vec::with_capacity(sealed.candidate_ids.len());
        for candidate in &sealed.candidate_ids {
            let tally: Tally =
                get_decoded(&self.tallies_db, &wtxn, &candidate_key(sealed.id, *candidate))?
                    .unwrap_or_default();
            tallies.push((*candidate, tally));
        }
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(tallies)
    }

    fn insert_result(&self, result: &VettingResult) -> Result<(), StoreError> {
        let key = candidate_key(result.session, result.candidate);
        self.insert_new(&self.results_db, &key, result, || {
            format!("result {}/{}", result.session, result.candidate)
        })
    }

    fn get_result(
        &self,
        session: SessionId,
        candidate: CandidateId,
    ) -> Result<Option<VettingResult>, StoreError> {
        self.read(&self.results_db, &candidate_key(session, candidate))
    }
}
