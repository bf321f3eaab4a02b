//! Commitment hash schemes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// Which hash function a session uses for `H(decision || secret || juror)`.
///
/// The preimage layout is the same for every scheme; only the digest differs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitScheme {
    /// Blake2b with a 256-bit output.
    #[default]
    Blake2b256,
    /// Keccak-256, identical to Solidity's `keccak256(abi.encodePacked(...))`.
    Keccak256,
}

impl CommitScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blake2b256 => "blake2b256",
            Self::Keccak256 => "keccak256",
        }
    }
}

impl fmt::Display for CommitScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommitScheme {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blake2b256" | "blake2b" | "blake2b_256" => Ok(Self::Blake2b256),
            "keccak256" | "keccak" | "keccak_256" => Ok(Self::Keccak256),
            other => Err(TypesError::UnknownScheme(other.to_string())),
        }
    }
}
