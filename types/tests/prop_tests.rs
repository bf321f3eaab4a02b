use proptest::prelude::*;

use vetting_types::{CommitHash, JurorAddress, Phase, SessionId, Timestamp};

fn phase_strategy() -> impl Strategy<Value = Phase> {
    prop_oneof![
        Just(Phase::JurySelection),
        Just(Phase::Commit),
        Just(Phase::Reveal),
        Just(Phase::Finalized),
    ]
}

proptest! {
    /// CommitHash hex form parses back to the same hash.
    #[test]
    fn commit_hash_hex_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = CommitHash::new(bytes);
        prop_assert_eq!(CommitHash::from_hex(&hash.to_hex()).unwrap(), hash);
    }

    /// CommitHash::is_zero is true only for all-zero bytes.
    #[test]
    fn commit_hash_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        let hash = CommitHash::new(bytes);
        prop_assert_eq!(hash.is_zero(), bytes == [0u8; 32]);
    }

    /// Session id keys sort the same way as the ids themselves.
    #[test]
    fn session_id_key_order_matches_numeric_order(a in any::<u64>(), b in any::<u64>()) {
        let ka = SessionId::new(a).to_be_bytes();
        let kb = SessionId::new(b).to_be_bytes();
        prop_assert_eq!(ka.cmp(&kb), a.cmp(&b));
    }

    /// Phase ordering agrees with the numeric phase code.
    #[test]
    fn phase_order_matches_code(a in phase_strategy(), b in phase_strategy()) {
        prop_assert_eq!(a.cmp(&b), a.code().cmp(&b.code()));
    }

    /// Every 20-byte EVM address yields its raw bytes as identity, regardless of case.
    #[test]
    fn evm_identity_bytes_roundtrip(bytes in prop::array::uniform20(0u8..), upper in any::<bool>()) {
        let mut digits = bytes.iter().map(|b| format!("{b:02x}")).collect::<String>();
        if upper {
            digits = digits.to_ascii_uppercase();
        }
        let addr = JurorAddress::new(format!("0x{digits}"));
        prop_assert_eq!(addr.identity_bytes(), bytes.to_vec());
    }

    /// Timestamp::within agrees with manual arithmetic on half-open windows.
    #[test]
    fn timestamp_within_correct(start in 0u64..500_000, len in 1u64..500_000, at in 0u64..1_000_000) {
        let t = Timestamp::new(at);
        let inside = at >= start && at < start + len;
        prop_assert_eq!(t.within(Timestamp::new(start), Timestamp::new(start + len)), inside);
    }

    /// Timestamp::until saturates to 0 when the target is in the past.
    #[test]
    fn timestamp_until_saturates(base in 0u64..1_000_000, offset in 0u64..1_000_000) {
        let earlier = Timestamp::new(base);
        let later = Timestamp::new(base + offset);
        prop_assert_eq!(earlier.until(later), offset);
        prop_assert_eq!(later.until(earlier), 0);
    }

    /// CommitHash bincode serialization roundtrip.
    #[test]
    fn commit_hash_bincode_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = CommitHash::new(bytes);
        let encoded = bincode::serialize(&hash).unwrap();
        let decoded: CommitHash = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, hash);
    }
}
