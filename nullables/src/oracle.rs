//! Nullable oracle: records jury selection requests without answering them.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use vetting_oracle::{JurySelectionOracle, OracleError};
use vetting_types::{RequestId, SessionId};

/// A jury-selection request as seen by the oracle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub session: SessionId,
    pub jury_size: u32,
    pub request: RequestId,
}

/// An oracle that hands out request ids and remembers what was asked.
///
/// Tests play the oracle's callback themselves, which makes late, duplicate
/// or malformed fulfilments easy to stage.
#[derive(Debug)]
pub struct NullOracle {
    next_request: AtomicU64,
    failing: AtomicBool,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl NullOracle {
    pub fn new() -> Self {
        Self {
            next_request: AtomicU64::new(1),
            failing: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Make subsequent requests fail with `Unavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests().last().copied()
    }
}

impl Default for NullOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl JurySelectionOracle for NullOracle {
    fn request_jury_selection(
        &self,
        session: SessionId,
        jury_size: u32,
    ) -> Result<RequestId, OracleError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(OracleError::Unavailable("null oracle set to fail".into()));
        }
        let request = RequestId::new(self.next_request.fetch_add(1, Ordering::SeqCst));
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedRequest {
                session,
                jury_size,
                request,
            });
        Ok(request)
    }

    fn name(&self) -> &str {
        "null-oracle"
    }
}
