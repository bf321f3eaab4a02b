//! Numeric identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            pub const fn get(&self) -> u64 {
                self.0
            }

            /// Big-endian bytes, used as (prefix of) storage keys so that
            /// byte order matches numeric order.
            pub fn to_be_bytes(&self) -> [u8; 8] {
                self.0.to_be_bytes()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

numeric_id!(
    /// Identifies a vetting session. Allocated from a monotonic counter starting at 1.
    SessionId,
    "session"
);
numeric_id!(
    /// The election whose candidates a session vets.
    ElectionId,
    "election"
);
numeric_id!(
    /// A candidate under review.
    CandidateId,
    "candidate"
);
numeric_id!(
    /// Handle returned by the randomness oracle for a jury selection request.
    RequestId,
    "request"
);
