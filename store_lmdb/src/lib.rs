//! LMDB storage backend for the vetting jury protocol.
//!
//! Implements all storage traits from `vetting-store` using the `heed` LMDB
//! bindings. Every table is a named database inside a single environment;
//! values are bincode, keys are big-endian composites so a prefix range-scan
//! lists everything under a session or candidate.

pub mod environment;
pub mod error;
pub mod integrity;
pub mod keys;
pub mod store;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use integrity::{check_integrity, IntegrityReport};
pub use store::LmdbVettingStore;
