//! Phase derivation.
//!
//! The phase of a session is never stored. It is a pure function of the
//! session record and the caller's clock. The record only moves forward (the
//! jury is installed once, sealing is permanent), so for a fixed record the
//! phase never decreases as `now` grows.

use vetting_types::{Phase, Timestamp, VettingSession};

use crate::VettingError;

pub struct PhaseClock;

impl PhaseClock {
    /// Phase implied by the session record alone.
    ///
    /// No jury means JurySelection regardless of time; a sealed session is
    /// Finalized regardless of time.
    pub fn derive(session: &VettingSession, now: Timestamp) -> Phase {
        if session.is_sealed() {
            return Phase::Finalized;
        }
        if !session.has_jury() {
            return Phase::JurySelection;
        }
        if now >= session.reveal_end {
            Phase::Finalized
        } else if now >= session.commit_end {
            Phase::Reveal
        } else {
            Phase::Commit
        }
    }

    /// A session is expired once its commit window closed with no jury, or
    /// once its creator abandoned it.
    pub fn is_expired(session: &VettingSession, now: Timestamp) -> bool {
        session.abandoned || (!session.has_jury() && now >= session.commit_end)
    }

    /// Fail with `PhaseMismatch` unless the session is in `expected`.
    pub fn require(
        session: &VettingSession,
        now: Timestamp,
        expected: Phase,
    ) -> Result<Phase, VettingError> {
        let actual = Self::derive(session, now);
        if actual != expected {
            return Err(VettingError::PhaseMismatch {
                session: session.id,
                expected,
                actual,
            });
        }
        Ok(actual)
    }
}
