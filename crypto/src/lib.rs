//! Cryptographic primitives for the vetting jury protocol.
//!
//! - **Blake2b-256** and **Keccak-256** digests
//! - The juror commitment `H(decision || secret || juror)` and its verification
//! - Random reveal secrets that are wiped from memory on drop

pub mod commitment;
pub mod error;
pub mod hash;
pub mod secret;

pub use commitment::{commitment_hash, commitment_preimage, verify_commitment};
pub use error::CryptoError;
pub use hash::{blake2b_256, blake2b_256_multi, keccak_256, keccak_256_multi};
pub use secret::Secret;
