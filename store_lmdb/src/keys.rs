//! Composite key layout.
//!
//! | table        | key                                         |
//! |--------------|---------------------------------------------|
//! | sessions     | `session_be8`                               |
//! | commitments  | `session_be8 ++ candidate_be8 ++ juror`     |
//! | reveals      | `session_be8 ++ candidate_be8 ++ juror`     |
//! | tallies      | `session_be8 ++ candidate_be8`              |
//! | results      | `session_be8 ++ candidate_be8`              |
//! | stakes       | `session_be8 ++ juror`                      |
//!
//! Big-endian ids keep LMDB's byte order equal to numeric order, and the
//! fixed-width prefixes make every juror suffix unambiguous.

use vetting_types::{CandidateId, JurorAddress, SessionId};

pub fn session_key(session: SessionId) -> [u8; 8] {
    session.to_be_bytes()
}

pub fn candidate_key(session: SessionId, candidate: CandidateId) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&session.to_be_bytes());
    key[8..].copy_from_slice(&candidate.to_be_bytes());
    key
}

pub fn juror_key(session: SessionId, candidate: CandidateId, juror: &JurorAddress) -> Vec<u8> {
    let j = juror.as_str().as_bytes();
    let mut key = Vec::with_capacity(16 + j.len());
    key.extend_from_slice(&candidate_key(session, candidate));
    key.extend_from_slice(j);
    key
}

pub fn stake_key(session: SessionId, juror: &JurorAddress) -> Vec<u8> {
    let j = juror.as_str().as_bytes();
    let mut key = Vec::with_capacity(8 + j.len());
    key.extend_from_slice(&session.to_be_bytes());
    key.extend_from_slice(j);
    key
}

/// Turn `prefix` into the smallest key greater than every key it prefixes.
///
/// Trailing `0xff` bytes are dropped before the increment. An all-`0xff`
/// prefix becomes empty, which callers treat as "no upper bound".
pub fn increment_prefix(prefix: &mut Vec<u8>) {
    while let Some(last) = prefix.pop() {
        if last < 0xff {
            prefix.push(last + 1);
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_order_is_byte_order() {
        let a = session_key(SessionId::new(2));
        let b = session_key(SessionId::new(256));
        assert!(a < b);
    }

    #[test]
    fn juror_key_extends_candidate_prefix() {
        let s = SessionId::new(1);
        let c = CandidateId::new(9);
        let key = juror_key(s, c, &JurorAddress::new("alice"));
        assert!(key.starts_with(&candidate_key(s, c)));
        assert_eq!(&key[16..], b"alice");
    }

    #[test]
    fn increment_handles_carry() {
        let mut p = vec![0x01, 0xff];
        increment_prefix(&mut p);
        assert_eq!(p, vec![0x02]);

        let mut p = vec![0xff, 0xff];
        increment_prefix(&mut p);
        assert!(p.is_empty());

        let mut p = vec![0x00, 0x10];
        increment_prefix(&mut p);
        assert_eq!(p, vec![0x00, 0x11]);
    }
}
