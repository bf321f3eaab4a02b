//! Reveal secrets.
//!
//! Custody of the secret between commit and reveal is the juror's
//! responsibility. This type only generates one and keeps it out of logs.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::CryptoError;

/// Number of random bytes in a generated secret.
pub const SECRET_BYTES: usize = 32;

/// A reveal secret. Wiped on drop and redacted from `Debug`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Secret(String);

impl Secret {
    /// Wrap an existing secret string.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Draw [`SECRET_BYTES`] from the OS entropy source, rendered as `0x` hex.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut bytes = [0u8; SECRET_BYTES];
        getrandom::getrandom(&mut bytes).map_err(|e| CryptoError::Entropy(e.to_string()))?;
        let secret = Self(format!("0x{}", hex::encode(bytes)));
        bytes.zeroize();
        Ok(secret)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}
