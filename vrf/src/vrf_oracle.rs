//! In-process jury selection oracle backed by a VRF.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, RwLock};

use vetting_types::{JurorAddress, RequestId, SessionId};

use crate::{
    FulfilmentSender, JuryFulfilment, JurySelectionOracle, JurySelector, OracleError, VrfProvider,
};

#[derive(Clone, Copy, Debug)]
struct PendingRequest {
    request: RequestId,
    session: SessionId,
    jury_size: u32,
}

/// Queues jury selection requests and fulfils them on demand.
///
/// Requests are answered out of band: [`VrfJuryOracle::fulfil_pending`]
/// (or [`VrfJuryOracle::deliver_pending`] over a channel) draws randomness for
/// every queued request and selects the jury from the eligible pool.
///
/// The pool is kept sorted and free of duplicates, so its length is the
/// number of distinct jurors a selection can return.
pub struct VrfJuryOracle<V> {
    vrf: V,
    pool: RwLock<Vec<JurorAddress>>,
    pending: Mutex<VecDeque<PendingRequest>>,
    next_request: AtomicU64,
}

impl<V: VrfProvider> VrfJuryOracle<V> {
    pub fn new(vrf: V, pool: Vec<JurorAddress>) -> Self {
        Self {
            vrf,
            pool: RwLock::new(distinct(pool)),
            pending: Mutex::new(VecDeque::new()),
            next_request: AtomicU64::new(1),
        }
    }

    /// Replace the eligible pool. Applies to requests fulfilled afterwards.
    pub fn set_pool(&self, pool: Vec<JurorAddress>) {
        let pool = distinct(pool);
        match self.pool.write() {
            Ok(mut guard) => *guard = pool,
            Err(poisoned) => *poisoned.into_inner() = pool,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.queue().len()
    }

    /// Fulfil every queued request.
    ///
    /// All or nothing: if randomness cannot be obtained for any request, every
    /// request taken by this call goes back to the head of the queue in its
    /// original order and the error is returned.
    pub fn fulfil_pending(&self) -> Result<Vec<JuryFulfilment>, OracleError> {
        let mut done: Vec<(PendingRequest, JuryFulfilment)> = Vec::new();
        loop {
            let Some(next) = self.queue().pop_front() else {
                break;
            };
            match self.select(next) {
                Ok(fulfilment) => done.push((next, fulfilment)),
                Err(e) => {
                    let mut queue = self.queue();
                    queue.push_front(next);
                    for (req, _) in done.iter().rev() {
                        queue.push_front(*req);
                    }
                    tracing::warn!(
                        requeued = done.len() + 1,
                        error = %e,
                        "jury selection failed, requests requeued"
                    );
                    return Err(e);
                }
            }
        }
        Ok(done.into_iter().map(|(_, fulfilment)| fulfilment).collect())
    }

    /// Fulfil every queued request and push the results into `sender`.
    pub async fn deliver_pending(&self, sender: &FulfilmentSender) -> Result<usize, OracleError> {
        let fulfilments = self.fulfil_pending()?;
        let count = fulfilments.len();
        for fulfilment in fulfilments {
            sender.send(fulfilment).await?;
        }
        Ok(count)
    }

    fn select(&self, req: PendingRequest) -> Result<JuryFulfilment, OracleError> {
        let mut context = Vec::with_capacity(16);
        context.extend_from_slice(&req.session.to_be_bytes());
        context.extend_from_slice(&req.request.to_be_bytes());
        let seed = self.vrf.get_randomness(&context)?.value;

        let pool = match self.pool.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        let jurors = JurySelector.select(&seed, &pool, req.jury_size as usize);
        tracing::debug!(
            session = %req.session,
            request = %req.request,
            provider = self.vrf.name(),
            selected = jurors.len(),
            "jury selected"
        );
        Ok(JuryFulfilment {
            session: req.session,
            request: req.request,
            jurors,
        })
    }

    fn queue(&self) -> MutexGuard<'_, VecDeque<PendingRequest>> {
        match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn distinct(mut pool: Vec<JurorAddress>) -> Vec<JurorAddress> {
    pool.sort();
    pool.dedup();
    pool
}

impl<V: VrfProvider> JurySelectionOracle for VrfJuryOracle<V> {
    fn request_jury_selection(
        &self,
        session: SessionId,
        jury_size: u32,
    ) -> Result<RequestId, OracleError> {
        let available = match self.pool.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        };
        if available < jury_size as usize {
            return Err(OracleError::PoolTooSmall {
                available,
                requested: jury_size as usize,
            });
        }
        let request = RequestId::new(self.next_request.fetch_add(1, Ordering::SeqCst));
        self.queue().push_back(PendingRequest {
            request,
            session,
            jury_size,
        });
        tracing::info!(%session, %request, jury_size, "jury selection requested");
        Ok(request)
    }

    fn name(&self) -> &str {
        "vrf-jury-oracle"
    }
}
