//! Asynchronous delivery of oracle fulfilments.
//!
//! The oracle side holds a [`FulfilmentSender`]; whoever owns the engine
//! awaits the [`FulfilmentReceiver`] and applies each fulfilment through the
//! engine's callback. Delivery latency is unbounded from the protocol's point
//! of view.

use tokio::sync::mpsc;

use crate::{JuryFulfilment, OracleError};

/// Create a bounded fulfilment channel.
pub fn fulfilment_channel(capacity: usize) -> (FulfilmentSender, FulfilmentReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (FulfilmentSender { tx }, FulfilmentReceiver { rx })
}

#[derive(Clone, Debug)]
pub struct FulfilmentSender {
    tx: mpsc::Sender<JuryFulfilment>,
}

impl FulfilmentSender {
    /// Deliver a fulfilment, waiting for buffer space.
    pub async fn send(&self, fulfilment: JuryFulfilment) -> Result<(), OracleError> {
        self.tx
            .send(fulfilment)
            .await
            .map_err(|_| OracleError::ChannelClosed)
    }
}

#[derive(Debug)]
pub struct FulfilmentReceiver {
    rx: mpsc::Receiver<JuryFulfilment>,
}

impl FulfilmentReceiver {
    /// Next fulfilment, or `None` once every sender is dropped and the buffer
    /// is drained.
    pub async fn recv(&mut self) -> Option<JuryFulfilment> {
        self.rx.recv().await
    }
}
