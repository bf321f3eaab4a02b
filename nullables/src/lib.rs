//! Nullable infrastructure for deterministic testing.
//!
//! Everything the vetting engine talks to (clock, storage, randomness, the
//! jury-selection oracle) has a test-friendly stand-in here that:
//! - returns deterministic values
//! - can be controlled programmatically
//! - never touches the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod oracle;
pub mod random;
pub mod store;

pub use clock::NullClock;
pub use oracle::{NullOracle, RecordedRequest};
pub use random::NullRandom;
pub use store::NullVettingStore;
