//! Fundamental types for the vetting jury protocol.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! identifiers, juror addresses, commitment hashes, timestamps, the session record
//! and the per-juror commitment/reveal records.

pub mod address;
pub mod error;
pub mod hash;
pub mod ids;
pub mod record;
pub mod scheme;
pub mod session;
pub mod time;

pub use address::JurorAddress;
pub use error::TypesError;
pub use hash::CommitHash;
pub use ids::{CandidateId, ElectionId, RequestId, SessionId};
pub use record::{Commitment, Reveal, StakeRecord, Tally, VettingResult};
pub use scheme::CommitScheme;
pub use session::{ApprovalThreshold, Phase, VettingSession};
pub use time::Timestamp;
