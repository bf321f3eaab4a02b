//! The juror commitment scheme.
//!
//! A commitment binds a juror to a decision without disclosing it:
//!
//! ```text
//! preimage = decision_byte || secret || juror_identity
//! hash     = H(preimage)
//! ```
//!
//! - `decision_byte` is `0x01` for approve and `0x00` for reject.
//! - `secret` is the UTF-8 bytes of the juror's secret string.
//! - `juror_identity` is [`JurorAddress::identity_bytes`]: 20 raw bytes for an
//!   EVM address, UTF-8 bytes otherwise.
//! - `H` is the session's [`CommitScheme`].
//!
//! With `Keccak256` and an EVM address this is exactly
//! `keccak256(abi.encodePacked(bool, string, address))`. The juror identity
//! stops one juror from replaying another's commitment; the secret stops the
//! decision being guessed from the hash before the reveal.

use vetting_types::{CommitHash, CommitScheme, JurorAddress};

use crate::hash::{blake2b_256, keccak_256};

/// Build the packed preimage for a commitment.
pub fn commitment_preimage(decision: bool, secret: &str, juror: &JurorAddress) -> Vec<u8> {
    let identity = juror.identity_bytes();
    let mut preimage = Vec::with_capacity(1 + secret.len() + identity.len());
    preimage.push(u8::from(decision));
    preimage.extend_from_slice(secret.as_bytes());
    preimage.extend_from_slice(&identity);
    preimage
}

/// Compute `H(decision || secret || juror)` under `scheme`.
pub fn commitment_hash(
    scheme: CommitScheme,
    decision: bool,
    secret: &str,
    juror: &JurorAddress,
) -> CommitHash {
    let preimage = commitment_preimage(decision, secret, juror);
    let digest = match scheme {
        CommitScheme::Blake2b256 => blake2b_256(&preimage),
        CommitScheme::Keccak256 => keccak_256(&preimage),
    };
    CommitHash::new(digest)
}

/// Check that `(decision, secret, juror)` opens `expected`.
pub fn verify_commitment(
    scheme: CommitScheme,
    expected: &CommitHash,
    decision: bool,
    secret: &str,
    juror: &JurorAddress,
) -> bool {
    commitment_hash(scheme, decision, secret, juror) == *expected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evm_juror() -> JurorAddress {
        JurorAddress::new("0x0000000000000000000000000000000000000001")
    }

    #[test]
    fn keccak_matches_abi_encode_packed() {
        let hash = commitment_hash(CommitScheme::Keccak256, true, "0xdeadbeef", &evm_juror());
        assert_eq!(
            hash.to_hex(),
            "0x72061fd50715c3a83bf15bfaaf82805ff1f700e3ff7a02896fcc3b5a8c1a4d01"
        );
    }

    #[test]
    fn blake2b_fixture() {
        let hash = commitment_hash(CommitScheme::Blake2b256, true, "0xdeadbeef", &evm_juror());
        assert_eq!(
            hash.to_hex(),
            "0x21b7ded411624469b117be126c051f714cbba2558a528c176aa14757cddd230d"
        );

        let plain = JurorAddress::new("juror_alice");
        let hash = commitment_hash(CommitScheme::Blake2b256, true, "hunter2", &plain);
        assert_eq!(
            hash.to_hex(),
            "0x2318d58f9dbf9246229b68d338b02e526de967e38b5f30c4fe5c320e05f7d6b6"
        );
    }

    #[test]
    fn preimage_layout() {
        let juror = JurorAddress::new("j");
        assert_eq!(commitment_preimage(true, "s", &juror), vec![1, b's', b'j']);
        assert_eq!(commitment_preimage(false, "", &juror), vec![0, b'j']);
    }

    #[test]
    fn flipped_decision_does_not_verify() {
        let juror = JurorAddress::new("juror_bob");
        let hash = commitment_hash(CommitScheme::Blake2b256, true, "s3cret", &juror);
        assert!(verify_commitment(CommitScheme::Blake2b256, &hash, true, "s3cret", &juror));
        assert!(!verify_commitment(CommitScheme::Blake2b256, &hash, false, "s3cret", &juror));
    }

    #[test]
    fn other_juror_cannot_replay() {
        let alice = JurorAddress::new("juror_alice");
        let bob = JurorAddress::new("juror_bob");
        let hash = commitment_hash(CommitScheme::Keccak256, true, "s3cret", &alice);
        assert!(!verify_commitment(CommitScheme::Keccak256, &hash, true, "s3cret", &bob));
    }

    #[test]
    fn schemes_disagree() {
        let juror = evm_juror();
        assert_ne!(
            commitment_hash(CommitScheme::Blake2b256, false, "x", &juror),
            commitment_hash(CommitScheme::Keccak256, false, "x", &juror)
        );
    }
}
