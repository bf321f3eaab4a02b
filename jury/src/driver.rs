//! Applies oracle fulfilments to an engine as they arrive.

use vetting_oracle::{FulfilmentReceiver, JurySelectionOracle};
use vetting_store::VettingStore;
use vetting_types::Timestamp;

use crate::engine::VettingEngine;

/// Drain `rx` into `engine` until every sender is dropped.
///
/// A rejected fulfilment (late, unexpected, malformed) is logged and skipped.
/// Returns how many fulfilments were applied.
pub async fn drive_fulfilments<S, O, F>(
    engine: &VettingEngine<S, O>,
    mut rx: FulfilmentReceiver,
    clock: F,
) -> usize
where
    S: VettingStore,
    O: JurySelectionOracle,
    F: Fn() -> Timestamp,
{
    let mut applied = 0;
    while let Some(fulfilment) = rx.recv().await {
        let session = fulfilment.session;
        let request = fulfilment.request;
        match engine.apply_fulfilment(fulfilment, clock()) {
            Ok(()) => applied += 1,
            Err(e) => {
                tracing::warn!(%session, %request, error = %e, "dropping oracle fulfilment")
            }
        }
    }
    tracing::debug!(applied, "fulfilment channel closed");
    applied
}
