//! Commitment hash type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// A 32-byte commitment hash: `H(decision || secret || juror)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitHash([u8; 32]);

impl CommitHash {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Parse a 64-digit hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let raw = hex::decode(digits).map_err(|e| TypesError::InvalidHash(e.to_string()))?;
        let bytes: [u8; 32] = raw
            .try_into()
            .map_err(|v: Vec<u8>| TypesError::InvalidHash(format!("expected 32 bytes, got {}", v.len())))?;
        Ok(Self(bytes))
    }

    /// `0x`-prefixed lowercase hex, the form EVM tooling prints.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for CommitHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommitHash({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for CommitHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing_accepts_both_forms() {
        let h = CommitHash::new([0xab; 32]);
        assert_eq!(CommitHash::from_hex(&h.to_hex()).unwrap(), h);
        assert_eq!(CommitHash::from_hex(&h.to_hex()[2..]).unwrap(), h);
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert!(CommitHash::from_hex("0xabcd").is_err());
        assert!(CommitHash::from_hex("zz").is_err());
    }
}
