//! The vetting engine: ties the phase clock, commitment book, reveal validator
//! and tally engine to a store and a jury-selection oracle.
//!
//! Every call takes the caller's `now`. The phase is derived from the stored
//! record and `now` alone, so a rejected write never changes what other callers
//! see.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use vetting_oracle::{JuryFulfilment, JurySelectionOracle};
use vetting_store::{StoreError, VettingStore};
use vetting_types::{
    CandidateId, CommitHash, JurorAddress, Phase, RequestId, SessionId, Timestamp,
    VettingResult, VettingSession,
};

use crate::commitment::CommitmentBook;
use crate::events::VettingEvent;
use crate::params::VettingParams;
use crate::phase::PhaseClock;
use crate::reveal::{RevealSubmission, RevealValidator};
use crate::session::SessionSpec;
use crate::stake::StakeLedger;
use crate::tally::TallyEngine;
use crate::view::{JurorReport, SessionView};
use crate::VettingError;

pub struct VettingEngine<S, O> {
    store: Arc<S>,
    oracle: O,
    params: VettingParams,
    commitments: CommitmentBook,
    reveals: RevealValidator,
    stakes: StakeLedger,
    tally: TallyEngine,
    /// Pending events for the host to process.
    events: Mutex<Vec<VettingEvent>>,
}

impl<S: VettingStore, O: JurySelectionOracle> VettingEngine<S, O> {
    pub fn new(store: Arc<S>, oracle: O, params: VettingParams) -> Self {
        Self {
            store,
            oracle,
            params,
            commitments: CommitmentBook,
            reveals: RevealValidator,
            stakes: StakeLedger,
            tally: TallyEngine,
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn params(&self) -> &VettingParams {
        &self.params
    }

    // ── Session lifecycle ──────────────────────────────────────────────

    /// Open a new session. Nothing is allocated if validation or the write fails.
    pub fn create_session(
        &self,
        creator: &JurorAddress,
        spec: &SessionSpec,
        now: Timestamp,
    ) -> Result<SessionId, VettingError> {
        let template = spec.plan(SessionId::new(0), creator, &self.params, now)?;
        let session = self.store.insert_next_session(&|id| VettingSession {
            id,
            ..template.clone()
        })?;
        let id = session.id;

        tracing::info!(
            session = %id,
            election = %session.election_id,
            candidates = session.candidate_ids.len(),
            jury_size = session.jury_size,
            "vetting session created"
        );
        self.emit(VettingEvent::SessionCreated {
            session: id,
            election: session.election_id,
            creator: creator.clone(),
            jury_size: session.jury_size,
            commit_end: session.commit_end,
            reveal_end: session.reveal_end,
        });
        Ok(id)
    }

    /// Ask the oracle for a jury. Only one request may be outstanding.
    pub fn request_jury_selection(
        &self,
        caller: &JurorAddress,
        session_id: SessionId,
        now: Timestamp,
    ) -> Result<RequestId, VettingError> {
        let session = self.load(session_id)?;
        Self::require_creator(&session, caller)?;
        if PhaseClock::is_expired(&session, now) {
            return Err(VettingError::SessionExpired(session_id));
        }
        if session.has_jury() {
            return Err(VettingError::PhaseMismatch {
                session: session_id,
                expected: Phase::JurySelection,
                actual: PhaseClock::derive(&session, now),
            });
        }
        if session.pending_request.is_some() {
            return Err(VettingError::SelectionAlreadyRequested(session_id));
        }

        let request = self
            .oracle
            .request_jury_selection(session_id, session.jury_size)?;
        let mut updated = session.clone();
        updated.pending_request = Some(request);
        self.store.compare_and_swap_session(&session, &updated)?;

        tracing::info!(
            session = %session_id,
            %request,
            oracle = self.oracle.name(),
            "jury selection requested"
        );
        self.emit(VettingEvent::JurySelectionRequested {
            session: session_id,
            request,
        });
        Ok(request)
    }

    /// Oracle callback: install the jury. Opens the Commit phase.
    pub fn on_jurors_selected(
        &self,
        session_id: SessionId,
        request: RequestId,
        jurors: Vec<JurorAddress>,
        now: Timestamp,
    ) -> Result<(), VettingError> {
        let session = self.load(session_id)?;
        if session.abandoned {
            return Err(VettingError::SessionExpired(session_id));
        }
        if session.has_jury() || session.pending_request != Some(request) {
            return Err(VettingError::UnexpectedOracleRequest {
                session: session_id,
                request,
            });
        }
        if now >= session.commit_end {
            tracing::warn!(session = %session_id, %request, "oracle callback arrived after the commit window");
            return Err(VettingError::SessionExpired(session_id));
        }
        if jurors.len() != session.jury_size as usize {
            return Err(VettingError::InvalidJurySet(format!(
                "expected {} jurors, got {}",
                session.jury_size,
                jurors.len()
            )));
        }
        let mut seen = HashSet::with_capacity(jurors.len());
        if let Some(dup) = jurors.iter().find(|j| !seen.insert(*j)) {
            return Err(VettingError::InvalidJurySet(format!("{dup} selected twice")));
        }

        let mut updated = session.clone();
        updated.jurors = jurors;
        updated.pending_request = None;
        self.store.compare_and_swap_session(&session, &updated)?;

        tracing::info!(session = %session_id, %request, "jury installed, commit phase open");
        self.emit(VettingEvent::JurorsSelected {
            session: session_id,
            jurors: updated.jurors,
        });
        Ok(())
    }

    /// Apply a fulfilment delivered over the oracle channel.
    pub fn apply_fulfilment(
        &self,
        fulfilment: JuryFulfilment,
        now: Timestamp,
    ) -> Result<(), VettingError> {
        self.on_jurors_selected(
            fulfilment.session,
            fulfilment.request,
            fulfilment.jurors,
            now,
        )
    }

    pub fn stake_as_juror(
        &self,
        session_id: SessionId,
        juror: &JurorAddress,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), VettingError> {
        let session = self.load_live(session_id)?;
        self.expect_phase(&session, now, Phase::Commit)?;
        let record = self
            .stakes
            .stake(self.store.as_ref(), &session, juror, amount, now)?;

        tracing::debug!(session = %session_id, %juror, amount, "juror staked");
        self.emit(VettingEvent::JurorStaked {
            session: session_id,
            juror: record.juror,
            amount: record.amount,
        });
        Ok(())
    }

    /// Record a juror's hiding commitment for one candidate.
    pub fn submit_commitment(
        &self,
        session_id: SessionId,
        candidate: CandidateId,
        juror: &JurorAddress,
        hash: CommitHash,
        now: Timestamp,
    ) -> Result<(), VettingError> {
        let session = self.load_live(session_id)?;
        self.expect_phase(&session, now, Phase::Commit)?;
        self.commitments
            .submit(self.store.as_ref(), &session, candidate, juror, hash, now)?;

        tracing::debug!(session = %session_id, %candidate, %juror, "vote committed");
        self.emit(VettingEvent::VoteCommitted {
            session: session_id,
            candidate,
            juror: juror.clone(),
        });
        Ok(())
    }

    /// Open a commitment. The vote counts only if it hashes to the stored
    /// commitment.
    pub fn submit_reveal(
        &self,
        session_id: SessionId,
        juror: &JurorAddress,
        submission: RevealSubmission,
        now: Timestamp,
    ) -> Result<(), VettingError> {
        let session = self.load_live(session_id)?;
        self.expect_phase(&session, now, Phase::Reveal)?;
        let candidate = submission.candidate;
        let result = self.reveals.submit(
            self.store.as_ref(),
            &session,
            &self.params,
            juror,
            submission,
            now,
        );
        let (reveal, tally) = match result {
            Ok(accepted) => accepted,
            Err(e @ VettingError::HashMismatch { .. }) => {
                tracing::warn!(session = %session_id, %candidate, %juror, "reveal does not open the commitment");
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        tracing::debug!(
            session = %session_id,
            %candidate,
            %juror,
            approvals = tally.approvals,
            rejections = tally.rejections,
            "vote revealed"
        );
        self.emit(VettingEvent::VoteRevealed {
            session: session_id,
            candidate,
            juror: reveal.juror,
            decision: reveal.decision,
        });
        Ok(())
    }

    /// Seal the session and cache a verdict for every candidate.
    ///
    /// Allowed once the Reveal phase has begun. Sealing early closes the
    /// reveal window for everyone.
    pub fn finalize(
        &self,
        caller: &JurorAddress,
        session_id: SessionId,
        now: Timestamp,
    ) -> Result<Vec<VettingResult>, VettingError> {
        let session = self.load(session_id)?;
        Self::require_creator(&session, caller)?;
        if session.is_sealed() {
            return Err(VettingError::AlreadyFinalized(session_id));
        }
        if session.abandoned {
            return Err(VettingError::SessionExpired(session_id));
        }
        let phase = PhaseClock::derive(&session, now);
        if phase < Phase::Reveal {
            return Err(VettingError::PhaseMismatch {
                session: session_id,
                expected: Phase::Reveal,
                actual: phase,
            });
        }
        self.seal(session, now)
    }

    /// Seal every auto-finalize session whose reveal window has closed.
    ///
    /// Failures are logged and skipped so one bad session never blocks the
    /// rest. Returns the ids sealed by this call.
    pub fn run_upkeep(&self, now: Timestamp) -> Result<Vec<SessionId>, VettingError> {
        let mut sealed = Vec::new();
        for id in self.store.list_sessions()? {
            let Some(session) = self.store.get_session(id)? else {
                continue;
            };
            if !session.auto_finalize
                || session.is_sealed()
                || session.abandoned
                || !session.has_jury()
                || now < session.reveal_end
            {
                continue;
            }
            match self.seal(session, now) {
                Ok(_) => sealed.push(id),
                Err(VettingError::AlreadyFinalized(_)) => {}
                Err(e) => tracing::warn!(session = %id, error = %e, "auto-finalization failed"),
            }
        }
        if !sealed.is_empty() {
            tracing::info!(count = sealed.len(), "upkeep sealed sessions");
        }
        Ok(sealed)
    }

    /// Give up on a session whose jury never arrived.
    ///
    /// Repeating the call on an abandoned session is a no-op.
    pub fn abandon_session(
        &self,
        caller: &JurorAddress,
        session_id: SessionId,
        now: Timestamp,
    ) -> Result<(), VettingError> {
        let session = self.load(session_id)?;
        Self::require_creator(&session, caller)?;
        if session.abandoned {
            return Ok(());
        }
        if !PhaseClock::is_expired(&session, now) {
            return Err(VettingError::SessionNotExpired(session_id));
        }
        let mut updated = session.clone();
        updated.abandoned = true;
        self.store.compare_and_swap_session(&session, &updated)?;

        tracing::info!(session = %session_id, "vetting session abandoned");
        self.emit(VettingEvent::SessionAbandoned {
            session: session_id,
        });
        Ok(())
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// Verdict for one candidate: the cached result once sealed, otherwise
    /// computed from the running tally.
    pub fn compute_result(
        &self,
        session_id: SessionId,
        candidate: CandidateId,
    ) -> Result<VettingResult, VettingError> {
        let session = self.load(session_id)?;
        Self::require_candidate(&session, candidate)?;
        if let Some(cached) = self.store.get_result(session_id, candidate)? {
            return Ok(cached);
        }
        let tally = self.store.tally(session_id, candidate)?;
        Ok(self.tally.evaluate(&session, candidate, tally))
    }

    /// Verdicts for every candidate, in creation order.
    pub fn results(&self, session_id: SessionId) -> Result<Vec<VettingResult>, VettingError> {
        let session = self.load(session_id)?;
        session
            .candidate_ids
            .iter()
            .map(|c| self.compute_result(session_id, *c))
            .collect()
    }

    /// Observable phase at `now`. Never writes.
    pub fn phase(&self, session_id: SessionId, now: Timestamp) -> Result<Phase, VettingError> {
        Ok(PhaseClock::derive(&self.load(session_id)?, now))
    }

    pub fn is_expired(&self, session_id: SessionId, now: Timestamp) -> Result<bool, VettingError> {
        Ok(PhaseClock::is_expired(&self.load(session_id)?, now))
    }

    pub fn session_view(
        &self,
        session_id: SessionId,
        now: Timestamp,
    ) -> Result<SessionView, VettingError> {
        let session = self.load(session_id)?;
        let phase = PhaseClock::derive(&session, now);
        let is_expired = PhaseClock::is_expired(&session, now);
        Ok(SessionView {
            id: session.id,
            election_id: session.election_id,
            creator: session.creator.clone(),
            candidate_ids: session.candidate_ids.clone(),
            jury_size: session.jury_size,
            jurors: session.jurors.clone(),
            commit_start: session.commit_start,
            commit_end: session.commit_end,
            reveal_end: session.reveal_end,
            stake_amount: session.stake_amount,
            auto_finalize: session.auto_finalize,
            threshold: session.threshold,
            scheme: session.scheme,
            pending_request: session.pending_request,
            phase,
            is_finalized: phase == Phase::Finalized,
            is_sealed: session.is_sealed(),
            is_expired,
        })
    }

    pub fn is_juror(&self, session_id: SessionId, who: &JurorAddress) -> Result<bool, VettingError> {
        Ok(self.load(session_id)?.is_juror(who))
    }

    pub fn has_committed(
        &self,
        session_id: SessionId,
        candidate: CandidateId,
        juror: &JurorAddress,
    ) -> Result<bool, VettingError> {
        let session = self.load(session_id)?;
        self.commitments
            .has_committed(self.store.as_ref(), &session, candidate, juror)
    }

    pub fn has_revealed(
        &self,
        session_id: SessionId,
        candidate: CandidateId,
        juror: &JurorAddress,
    ) -> Result<bool, VettingError> {
        let session = self.load(session_id)?;
        self.reveals
            .has_revealed(self.store.as_ref(), &session, candidate, juror)
    }

    pub fn has_staked(
        &self,
        session_id: SessionId,
        juror: &JurorAddress,
    ) -> Result<bool, VettingError> {
        self.load(session_id)?;
        Ok(self.store.get_stake(session_id, juror)?.is_some())
    }

    /// One report per juror, in jury order.
    pub fn juror_reports(
        &self,
        session_id: SessionId,
        candidate: CandidateId,
    ) -> Result<Vec<JurorReport>, VettingError> {
        let session = self.load(session_id)?;
        Self::require_candidate(&session, candidate)?;
        let mut reports = Vec::with_capacity(session.jurors.len());
        for juror in &session.jurors {
            let has_committed = self
                .store
                .get_commitment(session_id, candidate, juror)?
                .is_some();
            let reveal = self.store.get_reveal(session_id, candidate, juror)?;
            reports.push(JurorReport {
                juror: juror.clone(),
                has_committed,
                has_revealed: reveal.is_some(),
                decision: reveal.as_ref().map(|r| r.decision),
                evidence_ref: reveal.as_ref().map(|r| r.evidence_ref.clone()),
                findings: reveal.as_ref().map(|r| r.findings.clone()),
                revealed_at: reveal.as_ref().map(|r| r.revealed_at),
            });
        }
        Ok(reports)
    }

    /// Jurors that committed for `candidate` but have not revealed.
    pub fn non_revealers(
        &self,
        session_id: SessionId,
        candidate: CandidateId,
    ) -> Result<Vec<JurorAddress>, VettingError> {
        let session = self.load(session_id)?;
        Self::require_candidate(&session, candidate)?;
        self.stakes
            .non_revealers(self.store.as_ref(), &session, candidate)
    }

    pub fn session_count(&self) -> Result<u64, VettingError> {
        Ok(self.store.session_count()?)
    }

    pub fn list_sessions(&self) -> Result<Vec<SessionId>, VettingError> {
        Ok(self.store.list_sessions()?)
    }

    /// Take all events queued since the last drain.
    pub fn drain_events(&self) -> Vec<VettingEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn emit(&self, event: VettingEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    fn load(&self, id: SessionId) -> Result<VettingSession, VettingError> {
        self.store
            .get_session(id)?
            .ok_or(VettingError::SessionNotFound(id))
    }

    /// Load a session that still accepts juror writes.
    fn load_live(&self, id: SessionId) -> Result<VettingSession, VettingError> {
        let session = self.load(id)?;
        if session.abandoned {
            return Err(VettingError::SessionExpired(id));
        }
        Ok(session)
    }

    fn expect_phase(
        &self,
        session: &VettingSession,
        now: Timestamp,
        expected: Phase,
    ) -> Result<(), VettingError> {
        PhaseClock::require(session, now, expected)?;
        Ok(())
    }

    fn seal(
        &self,
        session: VettingSession,
        now: Timestamp,
    ) -> Result<Vec<VettingResult>, VettingError> {
        let id = session.id;
        let mut sealed = session.clone();
        sealed.finalized_at = Some(now);
        let tallies = match self.store.seal_session(&session, &sealed) {
            Ok(tallies) => tallies,
            Err(e @ StoreError::Conflict(_)) => {
                if self.load(id)?.is_sealed() {
                    return Err(VettingError::AlreadyFinalized(id));
                }
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        };

        let results: Vec<VettingResult> = tallies
            .into_iter()
            .map(|(candidate, tally)| self.tally.evaluate(&sealed, candidate, tally))
            .collect();
        for result in &results {
            match self.store.insert_result(result) {
                Ok(()) | Err(StoreError::Duplicate(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }

        tracing::info!(
            session = %id,
            approved = results.iter().filter(|r| r.approved).count(),
            candidates = results.len(),
            "vetting session finalized"
        );
        self.emit(VettingEvent::SessionFinalized {
            session: id,
            results: results.clone(),
        });
        Ok(results)
    }

    fn require_creator(session: &VettingSession, caller: &JurorAddress) -> Result<(), VettingError> {
        if session.creator != *caller {
            return Err(VettingError::Unauthorized(caller.clone()));
        }
        Ok(())
    }

    fn require_candidate(
        session: &VettingSession,
        candidate: CandidateId,
    ) -> Result<(), VettingError> {
        if !session.has_candidate(candidate) {
            return Err(VettingError::UnknownCandidate {
                session: session.id,
                candidate,
            });
        }
        Ok(())
    }
}
