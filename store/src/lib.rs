//! Abstract storage traits for the vetting jury protocol.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The protocol engine depends only on the traits.
//!
//! Writes that the protocol requires to happen at most once per key are
//! compare-and-set operations: they fail with [`StoreError::Duplicate`]
//! instead of overwriting. That per-key atomicity is the only synchronisation
//! the engine relies on.

pub mod commitment;
pub mod error;
pub mod result;
pub mod reveal;
pub mod session;
pub mod stake;

pub use commitment::CommitmentStore;
pub use error::StoreError;
pub use result::ResultStore;
pub use reveal::RevealStore;
pub use session::SessionStore;
pub use stake::StakeStore;

/// Everything the vetting engine needs from a backend.
pub trait VettingStore:
    SessionStore + CommitmentStore + RevealStore + StakeStore + ResultStore + Send + Sync
{
}

impl<T> VettingStore for T where
    T: SessionStore + CommitmentStore + RevealStore + StakeStore + ResultStore + Send + Sync
{
}
