//! Vetting jury: a commit-reveal protocol for reviewing election candidates.
//!
//! Lifecycle of a session: JurySelection → Commit → Reveal → Finalized.
//!
//! - The **phase clock** derives the phase from stored state and the current
//!   time; the jury set, not elapsed time, opens the Commit phase.
//! - The **commitment book** records one hiding commitment per
//!   (session, candidate, juror).
//! - The **reveal validator** accepts an opening only if it hashes to the
//!   stored commitment.
//! - The **tally engine** turns accepted reveals into a verdict. Jurors that
//!   never reveal are left out of the count.
//!
//! Storage and randomness are injected ([`vetting_store::VettingStore`],
//! [`vetting_oracle::JurySelectionOracle`]) so the protocol runs without a
//! chain.

pub mod commitment;
pub mod driver;
pub mod engine;
pub mod error;
pub mod events;
pub mod params;
pub mod phase;
pub mod reveal;
pub mod session;
pub mod stake;
pub mod tally;
pub mod view;

pub use commitment::CommitmentBook;
pub use driver::drive_fulfilments;
pub use engine::VettingEngine;
pub use error::VettingError;
pub use events::VettingEvent;
pub use params::VettingParams;
pub use phase::PhaseClock;
pub use reveal::{RevealSubmission, RevealValidator};
pub use session::SessionSpec;
pub use stake::StakeLedger;
pub use tally::TallyEngine;
pub use view::{JurorReport, SessionView};
