//! Nullable store: thread-safe in-memory storage for testing.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use vetting_store::{
    CommitmentStore, ResultStore, RevealStore, SessionStore, StakeStore, StoreError,
};
use vetting_types::{
    CandidateId, Commitment, JurorAddress, Reveal, SessionId, StakeRecord, Tally, VettingResult,
    VettingSession,
};

type JurorKey = (SessionId, CandidateId, JurorAddress);

#[derive(Default)]
struct Inner {
    last_session: u64,
    sessions: BTreeMap<SessionId, VettingSession>,
    commitments: BTreeMap<JurorKey, Commitment>,
    reveals: BTreeMap<JurorKey, Reveal>,
    tallies: HashMap<(SessionId, CandidateId), Tally>,
    stakes: BTreeMap<(SessionId, JurorAddress), StakeRecord>,
    results: HashMap<(SessionId, CandidateId), VettingResult>,
}

impl Inner {
    fn swap(&mut self, expected: &VettingSession, new: &VettingSession) -> Result<(), StoreError> {
        let current = self
            .sessions
            .get_mut(&expected.id)
            .ok_or_else(|| StoreError::NotFound(expected.id.to_string()))?;
        if *current != *expected {
            return Err(StoreError::Conflict(expected.id.to_string()));
        }
        *current = new.clone();
        Ok(())
    }
}

/// An in-memory implementation of every vetting store trait.
///
/// One lock guards all tables, so each trait method is atomic, matching the
/// single-write-transaction behaviour of the LMDB store.
/// Thread-safe for use with tokio's multi-threaded runtime.
#[derive(Default)]
pub struct NullVettingStore {
    inner: Mutex<Inner>,
    failing_writes: AtomicBool,
}

impl NullVettingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail with a backend error (reads keep working).
    pub fn set_failing_writes(&self, failing: bool) {
        self.failing_writes.store(failing, Ordering::SeqCst);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        if self.failing_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("null store set to fail writes".into()));
        }
        Ok(self.lock())
    }
}

impl SessionStore for NullVettingStore {
    fn insert_next_session(
        &self,
        build: &dyn Fn(SessionId) -> VettingSession,
    ) -> Result<VettingSession, StoreError> {
        let mut inner = self.write()?;
        let id = SessionId::new(inner.last_session + 1);
        let session = build(id);
        if session.id != id {
            return Err(StoreError::Conflict(format!(
                "built {} for allocated {id}",
                session.id
            )));
        }
        inner.last_session = id.get();
        inner.sessions.insert(id, session.clone());
        Ok(session)
    }

    fn session_count(&self) -> Result<u64, StoreError> {
        Ok(self.lock().last_session)
    }

    fn get_session(&self, id: SessionId) -> Result<Option<VettingSession>, StoreError> {
        Ok(self.lock().sessions.get(&id).cloned())
    }

    fn list_sessions(&self) -> Result<Vec<SessionId>, StoreError> {
        Ok(self.lock().sessions.keys().copied().collect())
    }

    fn compare_and_swap_session(
        &self,
        expected: &VettingSession,
        new: &VettingSession,
    ) -> Result<(), StoreError> {
        self.write()?.swap(expected, new)
    }
}

impl CommitmentStore for NullVettingStore {
    fn insert_commitment(&self, commitment: &Commitment) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let key = (commitment.session, commitment.candidate, commitment.juror.clone());
        if inner.commitments.contains_key(&key) {
            return Err(StoreError::Duplicate(format!(
                "commitment {}/{}/{}",
                key.0, key.1, key.2
            )));
        }
        inner.commitments.insert(key, commitment.clone());
        Ok(())
    }

    fn get_commitment(
        &self,
        session: SessionId,
        candidate: CandidateId,
        juror: &JurorAddress,
    ) -> Result<Option<Commitment>, StoreError> {
        Ok(self
            .lock()
            .commitments
            .get(&(session, candidate, juror.clone()))
            .cloned())
    }

    fn commitments_for(
        &self,
        session: SessionId,
        candidate: CandidateId,
    ) -> Result<Vec<Commitment>, StoreError> {
        Ok(self
            .lock()
            .commitments
            .values()
            .filter(|c| c.session == session && c.candidate == candidate)
            .cloned()
            .collect())
    }
}

impl RevealStore for NullVettingStore {
    fn record_reveal(&self, reveal: &Reveal) -> Result<Tally, StoreError> {
        let mut inner = self.write()?;
        let sealed = inner
            .sessions
            .get(&reveal.session)
            .ok_or_else(|| StoreError::NotFound(reveal.session.to_string()))?
            .is_sealed();
        if sealed {
            return Err(StoreError::Sealed(reveal.session));
        }
        let key = (reveal.session, reveal.candidate, reveal.juror.clone());
        if inner.reveals.contains_key(&key) {
            return Err(StoreError::Duplicate(format!(
                "reveal {}/{}/{}",
                key.0, key.1, key.2
            )));
        }
        inner.reveals.insert(key, reveal.clone());
        let tally = inner
            .tallies
            .entry((reveal.session, reveal.candidate))
            .or_default();
        tally.record(reveal.decision);
        Ok(*tally)
    }

    fn get_reveal(
        &self,
        session: SessionId,
        candidate: CandidateId,
        juror: &JurorAddress,
    ) -> Result<Option<Reveal>, StoreError> {
        Ok(self
            .lock()
            .reveals
            .get(&(session, candidate, juror.clone()))
            .cloned())
    }

    fn reveals_for(
        &self,
        session: SessionId,
        candidate: CandidateId,
    ) -> Result<Vec<Reveal>, StoreError> {
        Ok(self
            .lock()
            .reveals
            .values()
            .filter(|r| r.session == session && r.candidate == candidate)
            .cloned()
            .collect())
    }

    fn tally(&self, session: SessionId, candidate: CandidateId) -> Result<Tally, StoreError> {
        Ok(self
            .lock()
            .tallies
            .get(&(session, candidate))
            .copied()
            .unwrap_or_default())
    }
}

impl StakeStore for NullVettingStore {
    fn insert_stake(&self, stake: &StakeRecord) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let key = (stake.session, stake.juror.clone());
        if inner.stakes.contains_key(&key) {
            return Err(StoreError::Duplicate(format!("stake {}/{}", key.0, key.1)));
        }
        inner.stakes.insert(key, stake.clone());
        Ok(())
    }

    fn get_stake(
        &self,
        session: SessionId,
        juror: &JurorAddress,
    ) -> Result<Option<StakeRecord>, StoreError> {
        Ok(self.lock().stakes.get(&(session, juror.clone())).cloned())
    }

    fn stakes_for(&self, session: SessionId) -> Result<Vec<StakeRecord>, StoreError> {
        Ok(self
            .lock()
            .stakes
            .values()
            .filter(|s| s.session == session)
            .cloned()
            .collect())
    }
}

impl ResultStore for NullVettingStore {
    fn seal_session(
        &self,
        expected: &VettingSession,
        sealed: &VettingSession,
    ) -> Result<Vec<(CandidateId, Tally)>, StoreError> {
        let mut inner = self.write()?;
        inner.swap(expected, sealed)?;
        Ok(sealed
            .candidate_ids
            .iter()
            .map(|c| {
                let tally = inner.tallies.get(&(sealed.id, *c)).copied();
                (*c, tally.unwrap_or_default())
            })
            .collect())
    }

    fn insert_result(&self, result: &VettingResult) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let key = (result.session, result.candidate);
        if inner.results.contains_key(&key) {
            return Err(StoreError::Duplicate(format!("result {}/{}", key.0, key.1)));
        }
        inner.results.insert(key, result.clone());
        Ok(())
    }

    fn get_result(
        &self,
        session: SessionId,
        candidate: CandidateId,
    ) -> Result<Option<VettingResult>, StoreError> {
        Ok(self.lock().results.get(&(session, candidate)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vetting_types::{ApprovalThreshold, CommitScheme, ElectionId, Timestamp};

    fn session(id: SessionId) -> VettingSession {
        VettingSession {
            id,
            election_id: ElectionId::new(1),
            creator: JurorAddress::new("creator"),
            candidate_ids: vec![CandidateId::new(1), CandidateId::new(2)],
            jury_size: 5,
            jurors: Vec::new(),
            commit_start: Timestamp::new(0),
            commit_end: Timestamp::new(100),
            reveal_end: Timestamp::new(200),
            stake_amount: 0,
            auto_finalize: false,
            threshold: ApprovalThreshold::StrictMajority,
            scheme: CommitScheme::Blake2b256,
            pending_request: None,
            finalized_at: None,
            abandoned: false,
        }
    }

    fn create(store: &NullVettingStore) -> VettingSession {
        store.insert_next_session(&session).unwrap()
    }

    fn reveal(id: SessionId, juror: &str, decision: bool) -> Reveal {
        Reveal {
            session: id,
            candidate: CandidateId::new(1),
            juror: JurorAddress::new(juror),
            decision,
            evidence_ref: String::new(),
            findings: String::new(),
            revealed_at: Timestamp::new(150),
        }
    }

    #[test]
    fn stale_swap_conflicts() {
        let store = NullVettingStore::new();
        let original = create(&store);

        let mut first = original.clone();
        first.pending_request = Some(vetting_types::RequestId::new(1));
        store.compare_and_swap_session(&original, &first).unwrap();

        let mut second = original.clone();
        second.abandoned = true;
        assert!(matches!(
            store.compare_and_swap_session(&original, &second),
            Err(StoreError::Conflict(_))
        ));
    }

    #[test]
    fn session_ids_are_sequential() {
        let store = NullVettingStore::new();
        assert_eq!(create(&store).id, SessionId::new(1));
        assert_eq!(create(&store).id, SessionId::new(2));
        assert_eq!(store.session_count().unwrap(), 2);
        assert_eq!(
            store.list_sessions().unwrap(),
            vec![SessionId::new(1), SessionId::new(2)]
        );
    }

    #[test]
    fn reveal_and_tally_move_together() {
        let store = NullVettingStore::new();
        let id = create(&store).id;

        store.record_reveal(&reveal(id, "a", true)).unwrap();
        let t = store.record_reveal(&reveal(id, "b", false)).unwrap();
        assert_eq!(t, Tally { approvals: 1, rejections: 1 });

        assert!(matches!(
            store.record_reveal(&reveal(id, "a", false)),
            Err(StoreError::Duplicate(_))
        ));
        assert_eq!(store.tally(id, CandidateId::new(1)).unwrap().total(), 2);
    }

    #[test]
    fn sealing_freezes_tallies() {
        let store = NullVettingStore::new();
        let original = create(&store);
        let id = original.id;
        store.record_reveal(&reveal(id, "a", true)).unwrap();

        let mut sealed = original.clone();
        sealed.finalized_at = Some(Timestamp::new(200));
        let tallies = store.seal_session(&original, &sealed).unwrap();
        assert_eq!(
            tallies,
            vec![
                (CandidateId::new(1), Tally { approvals: 1, rejections: 0 }),
                (CandidateId::new(2), Tally::default()),
            ]
        );

        assert!(matches!(
            store.record_reveal(&reveal(id, "b", true)),
            Err(StoreError::Sealed(_))
        ));
        assert_eq!(store.tally(id, CandidateId::new(1)).unwrap().approvals, 1);
    }

    #[test]
    fn failing_writes_leave_reads_working() {
        let store = NullVettingStore::new();
        let id = create(&store).id;
        store.set_failing_writes(true);
        assert!(matches!(
            store.insert_next_session(&session),
            Err(StoreError::Backend(_))
        ));
        assert!(store.get_session(id).unwrap().is_some());
        assert_eq!(store.session_count().unwrap(), 1);
    }
}
