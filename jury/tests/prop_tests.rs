use std::sync::Arc;

use proptest::prelude::*;

use vetting_crypto::commitment_hash;
use vetting_jury::{
    PhaseClock, RevealSubmission, SessionSpec, VettingEngine, VettingError, VettingParams,
};
use vetting_nullables::{NullOracle, NullVettingStore};
use vetting_store::SessionStore;
use vetting_types::{
    CandidateId, CommitScheme, ElectionId, JurorAddress, Phase, SessionId, Timestamp,
};

const T0: u64 = 1_000_000;
const CANDIDATE: CandidateId = CandidateId::new(7);

type Engine = VettingEngine<NullVettingStore, NullOracle>;

fn creator() -> JurorAddress {
    JurorAddress::new("creator")
}

/// A session with `jury_size` seated jurors, still at `T0`.
fn seated(jury_size: u32, scheme: CommitScheme) -> (Engine, SessionId, Vec<JurorAddress>) {
    let engine = VettingEngine::new(
        Arc::new(NullVettingStore::new()),
        NullOracle::new(),
        VettingParams::default(),
    );
    let spec = SessionSpec::new(ElectionId::new(1), vec![CANDIDATE], jury_size).with_scheme(scheme);
    let now = Timestamp::new(T0);
    let id = engine.create_session(&creator(), &spec, now).unwrap();
    let request = engine.request_jury_selection(&creator(), id, now).unwrap();
    let jurors: Vec<JurorAddress> = (0..jury_size)
        .map(|i| JurorAddress::new(format!("juror-{i}")))
        .collect();
    engine
        .on_jurors_selected(id, request, jurors.clone(), now)
        .unwrap();
    (engine, id, jurors)
}

fn scheme_strategy() -> impl Strategy<Value = CommitScheme> {
    prop_oneof![Just(CommitScheme::Blake2b256), Just(CommitScheme::Keccak256)]
}

proptest! {
    /// Any reveal that differs from the commitment in decision or secret is
    /// rejected and leaves the juror unrevealed.
    #[test]
    fn tampered_reveal_never_counts(
        decision in any::<bool>(),
        secret in "[a-zA-Z0-9]{1,32}",
        other_secret in "[a-zA-Z0-9]{1,32}",
        flip in any::<bool>(),
        scheme in scheme_strategy(),
    ) {
        prop_assume!(flip || secret != other_secret);
        let (engine, id, jurors) = seated(5, scheme);
        let juror = &jurors[0];
        let hash = commitment_hash(scheme, decision, &secret, juror);
        engine
            .submit_commitment(id, CANDIDATE, juror, hash, Timestamp::new(T0))
            .unwrap();

        let commit_end = engine.session_view(id, Timestamp::new(T0)).unwrap().commit_end;
        let (revealed_decision, revealed_secret) = if flip {
            (!decision, secret.clone())
        } else {
            (decision, other_secret)
        };
        let err = engine
            .submit_reveal(
                id,
                juror,
                RevealSubmission::new(CANDIDATE, revealed_decision, revealed_secret),
                commit_end,
            )
            .unwrap_err();
        prop_assert!(matches!(err, VettingError::HashMismatch { .. }), "{}", err);
        prop_assert!(!engine.has_revealed(id, CANDIDATE, juror).unwrap());
        prop_assert_eq!(engine.compute_result(id, CANDIDATE).unwrap().total_reveals, 0);
    }

    /// Rejected writes stamped with arbitrary clocks never change the phase,
    /// and the phase a reader sees never decreases as its clock advances.
    #[test]
    fn phase_depends_only_on_the_record_and_the_clock(
        reads in prop::collection::vec(0u64..9_000, 1..40),
        writes in prop::collection::vec(0u64..9_000, 40),
    ) {
        let (engine, id, _) = seated(5, CommitScheme::Blake2b256);
        let snapshot = engine.store().get_session(id).unwrap().unwrap();
        let outsider = JurorAddress::new("outsider");
        let hash = commitment_hash(CommitScheme::Blake2b256, true, "x", &outsider);

        let mut reads = reads;
        reads.sort_unstable();
        let mut last = Phase::JurySelection;
        for (read, write) in reads.into_iter().zip(writes) {
            let written_at = Timestamp::new(T0 + write);
            let _ = engine.submit_commitment(id, CANDIDATE, &outsider, hash, written_at);
            let _ = engine.submit_reveal(
                id,
                &outsider,
                RevealSubmission::new(CANDIDATE, true, "x"),
                written_at,
            );

            let now = Timestamp::new(T0 + read);
            let phase = engine.phase(id, now).unwrap();
            prop_assert_eq!(phase, PhaseClock::derive(&snapshot, now));
            prop_assert!(phase >= last, "{:?} after {:?}", phase, last);
            last = phase;
        }
    }

    /// The verdict counts only revealed votes and is a strict majority of them.
    #[test]
    fn verdict_is_strict_majority_of_reveals(
        half in 2u32..6,
        votes in prop::collection::vec((any::<bool>(), any::<bool>()), 13),
    ) {
        let jury_size = half * 2 + 1;
        let (engine, id, jurors) = seated(jury_size, CommitScheme::Blake2b256);
        let t0 = Timestamp::new(T0);
        let plan: Vec<(&JurorAddress, bool, bool)> = jurors
            .iter()
            .zip(votes)
            .map(|(j, (decision, reveals))| (j, decision, reveals))
            .collect();

        for (juror, decision, _) in &plan {
            let hash = commitment_hash(CommitScheme::Blake2b256, *decision, "s", juror);
            engine.submit_commitment(id, CANDIDATE, juror, hash, t0).unwrap();
        }
        let commit_end = engine.session_view(id, t0).unwrap().commit_end;
        let (mut approvals, mut rejections) = (0u64, 0u64);
        for (juror, decision, reveals) in &plan {
            if !reveals {
                continue;
            }
            engine
                .submit_reveal(id, juror, RevealSubmission::new(CANDIDATE, *decision, "s"), commit_end)
                .unwrap();
            if *decision { approvals += 1 } else { rejections += 1 }
        }

        let result = engine.compute_result(id, CANDIDATE).unwrap();
        let total = approvals + rejections;
        prop_assert_eq!(result.approvals, approvals);
        prop_assert_eq!(result.rejections, rejections);
        prop_assert_eq!(result.total_reveals, total);
        prop_assert_eq!(result.approved, total > 0 && approvals * 2 > total);
        prop_assert!(result.approval_percentage <= 100);
        prop_assert_eq!(
            engine.non_revealers(id, CANDIDATE).unwrap().len() as u64,
            u64::from(jury_size) - total
        );
    }
}
