//! Jury selection oracle for vetting sessions.
//!
//! The protocol treats randomness as an external collaborator with an
//! asynchronous request/callback shape:
//!
//! 1. the engine calls [`JurySelectionOracle::request_jury_selection`] and
//!    receives a [`RequestId`];
//! 2. some time later the oracle delivers a [`JuryFulfilment`] carrying the
//!    selected jurors, which the engine applies through its callback.
//!
//! [`VrfJuryOracle`] is an in-process oracle that selects jurors from an
//! eligible pool using a [`VrfProvider`]. [`fulfilment_channel`] carries
//! fulfilments across tasks.

pub mod channel;
pub mod error;
pub mod local;
pub mod selection;
pub mod vrf_oracle;

pub use channel::{fulfilment_channel, FulfilmentReceiver, FulfilmentSender};
pub use error::OracleError;
pub use local::LocalVrf;
pub use selection::JurySelector;
pub use vrf_oracle::VrfJuryOracle;

use vetting_types::{JurorAddress, RequestId, SessionId};

/// Trait for providing verifiable randomness.
pub trait VrfProvider: Send + Sync {
    /// Get randomness for a given context (e.g. a session id).
    fn get_randomness(&self, context: &[u8]) -> Result<RandomOutput, OracleError>;

    /// Verify that a randomness output was correctly generated.
    fn verify(&self, context: &[u8], output: &RandomOutput) -> Result<bool, OracleError>;

    /// Human-readable name of this provider.
    fn name(&self) -> &str;
}

/// The output of a VRF: a random value with its proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomOutput {
    pub value: [u8; 32],
    pub proof: Vec<u8>,
    /// Round or epoch the value belongs to.
    pub round: u64,
}

/// The request half of the oracle boundary.
pub trait JurySelectionOracle: Send + Sync {
    /// Ask for `jury_size` jurors for `session`. Returns immediately; the
    /// jurors arrive later as a [`JuryFulfilment`].
    fn request_jury_selection(
        &self,
        session: SessionId,
        jury_size: u32,
    ) -> Result<RequestId, OracleError>;

    fn name(&self) -> &str;
}

/// The callback half of the oracle boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JuryFulfilment {
    pub session: SessionId,
    pub request: RequestId,
    pub jurors: Vec<JurorAddress>,
}

impl<T: JurySelectionOracle + ?Sized> JurySelectionOracle for std::sync::Arc<T> {
    fn request_jury_selection(
        &self,
        session: SessionId,
        jury_size: u32,
    ) -> Result<RequestId, OracleError> {
        (**self).request_jury_selection(session, jury_size)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
