//! Local hash-chain randomness.
//!
//! Derives `blake2b(seed || context)`. Reproducible by anyone holding the
//! seed, so it suits development networks and demos; it is not unbiasable.

use crate::{OracleError, RandomOutput, VrfProvider};

pub struct LocalVrf {
    seed: [u8; 32],
}

impl LocalVrf {
    pub fn new(seed: [u8; 32]) -> Self {
        Self { seed }
    }

    /// Seed from the OS entropy source.
    pub fn from_entropy() -> Result<Self, OracleError> {
        let secret = vetting_crypto::Secret::generate()
            .map_err(|e| OracleError::Randomness(e.to_string()))?;
        Ok(Self::new(vetting_crypto::blake2b_256(secret.expose().as_bytes())))
    }
}

impl VrfProvider for LocalVrf {
    fn get_randomness(&self, context: &[u8]) -> Result<RandomOutput, OracleError> {
        let value = vetting_crypto::blake2b_256_multi(&[&self.seed, context]);
        Ok(RandomOutput {
            value,
            proof: Vec::new(),
            round: 0,
        })
    }

    fn verify(&self, context: &[u8], output: &RandomOutput) -> Result<bool, OracleError> {
        Ok(self.get_randomness(context)?.value == output.value)
    }

    fn name(&self) -> &str {
        "local-hash-chain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_context_same_value() {
        let vrf = LocalVrf::new([5u8; 32]);
        let a = vrf.get_randomness(b"session#1").unwrap();
        let b = vrf.get_randomness(b"session#1").unwrap();
        assert_eq!(a, b);
        assert!(vrf.verify(b"session#1", &a).unwrap());
    }

    #[test]
    fn different_context_different_value() {
        let vrf = LocalVrf::new([5u8; 32]);
        let a = vrf.get_randomness(b"session#1").unwrap();
        let b = vrf.get_randomness(b"session#2").unwrap();
        assert_ne!(a.value, b.value);
        assert!(!vrf.verify(b"session#2", &a).unwrap());
    }
}
