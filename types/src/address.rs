//! Juror address type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// The identity of a caller as supplied by the wallet/RPC layer.
///
/// EVM-style addresses (`0x` followed by 40 hex digits) are normalised to
/// lowercase so that checksummed and plain spellings compare equal. Any other
/// non-empty string without whitespace is accepted verbatim. Deserialisation
/// goes through the same validation.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JurorAddress(String);

impl JurorAddress {
    /// Length in bytes of a raw EVM address.
    pub const EVM_ADDRESS_LEN: usize = 20;

    /// Create an address from a trusted string.
    ///
    /// # Panics
    /// Panics if the string is not a valid address. Use [`JurorAddress::parse`]
    /// for untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        match Self::parse(raw) {
            Ok(addr) => addr,
            Err(e) => panic!("{e}"),
        }
    }

    /// Parse and normalise an address.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        if s.is_empty() || s.chars().any(char::is_whitespace) {
            return Err(TypesError::InvalidAddress(s));
        }
        if is_evm_hex(&s) {
            return Ok(Self(s.to_ascii_lowercase()));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is an EVM-style `0x` address.
    pub fn is_evm(&self) -> bool {
        is_evm_hex(&self.0)
    }

    /// The bytes that identify this juror inside a commitment preimage.
    ///
    /// EVM addresses contribute their 20 raw bytes (matching Solidity's
    /// `abi.encodePacked(address)`); anything else contributes its UTF-8 bytes.
    pub fn identity_bytes(&self) -> Vec<u8> {
        if self.is_evm() {
            if let Ok(raw) = hex::decode(&self.0[2..]) {
                return raw;
            }
        }
        self.0.as_bytes().to_vec()
    }
}

fn is_evm_hex(s: &str) -> bool {
    let Some(digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) else {
        return false;
    };
    digits.len() == JurorAddress::EVM_ADDRESS_LEN * 2 && digits.chars().all(|c| c.is_ascii_hexdigit())
}

impl fmt::Display for JurorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for JurorAddress {
    type Error = TypesError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

impl From<JurorAddress> for String {
    fn from(addr: JurorAddress) -> Self {
        addr.0
    }
}

impl std::str::FromStr for JurorAddress {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
