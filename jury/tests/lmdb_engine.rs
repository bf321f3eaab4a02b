//! The engine over the LMDB backend: state survives a reopen and concurrent
//! reveals are all counted.

use std::sync::Arc;
use std::thread;

use vetting_crypto::commitment_hash;
use vetting_jury::{RevealSubmission, SessionSpec, VettingEngine, VettingParams};
use vetting_nullables::NullOracle;
use vetting_store_lmdb::{check_integrity, LmdbEnvironment, LmdbVettingStore};
use vetting_types::{CandidateId, CommitScheme, ElectionId, JurorAddress, Phase, Timestamp};

const T0: u64 = 1_700_000_000;
const MAP_SIZE: usize = 16 * 1024 * 1024;

fn engine_at(path: &std::path::Path) -> (LmdbEnvironment, VettingEngine<LmdbVettingStore, NullOracle>) {
    let env = LmdbEnvironment::open(path, 16, MAP_SIZE).unwrap();
    let store = Arc::new(env.vetting_store().unwrap());
    let engine = VettingEngine::new(store, NullOracle::new(), VettingParams::default());
    (env, engine)
}

#[test]
fn finalized_session_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let creator = JurorAddress::new("admin");
    let candidate = CandidateId::new(4);
    let jurors: Vec<JurorAddress> = (0..5).map(|i| JurorAddress::new(format!("j{i}"))).collect();
    let now = Timestamp::new(T0);

    let (id, expected) = {
        let (_env, engine) = engine_at(dir.path());
        let spec = SessionSpec::new(ElectionId::new(2), vec![candidate], 5);
        let id = engine.create_session(&creator, &spec, now).unwrap();
        let request = engine.request_jury_selection(&creator, id, now).unwrap();
        engine
            .on_jurors_selected(id, request, jurors.clone(), now)
            .unwrap();

        for (i, juror) in jurors.iter().enumerate() {
            let hash = commitment_hash(CommitScheme::Blake2b256, i % 2 == 0, "pw", juror);
            engine
                .submit_commitment(id, candidate, juror, hash, now)
                .unwrap();
        }
        let view = engine.session_view(id, now).unwrap();
        for (i, juror) in jurors.iter().enumerate().take(4) {
            engine
                .submit_reveal(
                    id,
                    juror,
                    RevealSubmission::new(candidate, i % 2 == 0, "pw"),
                    view.commit_end,
                )
                .unwrap();
        }
        let results = engine.finalize(&creator, id, view.reveal_end).unwrap();
        (id, results)
    };

    let (env, engine) = engine_at(dir.path());
    assert_eq!(engine.list_sessions().unwrap(), vec![id]);
    assert_eq!(engine.results(id).unwrap(), expected);
    let result = &expected[0];
    assert_eq!((result.approvals, result.rejections), (2, 2));
    assert!(!result.approved);

    // A sealed session reads as Finalized even for a reader whose clock is far behind.
    assert_eq!(engine.phase(id, now).unwrap(), Phase::Finalized);
    assert_eq!(engine.non_revealers(id, candidate).unwrap(), vec![jurors[4].clone()]);

    let report = check_integrity(env.env()).unwrap();
    assert!(report.is_healthy(), "{:?}", report.errors);
}

#[test]
fn concurrent_reveals_are_all_counted() {
    let dir = tempfile::tempdir().unwrap();
    let (_env, engine) = engine_at(dir.path());
    let creator = JurorAddress::new("admin");
    let candidate = CandidateId::new(1);
    let jurors: Vec<JurorAddress> = (0..9).map(|i| JurorAddress::new(format!("j{i}"))).collect();
    let now = Timestamp::new(T0);

    let spec = SessionSpec::new(ElectionId::new(1), vec![candidate], 9);
    let id = engine.create_session(&creator, &spec, now).unwrap();
    let request = engine.request_jury_selection(&creator, id, now).unwrap();
    engine
        .on_jurors_selected(id, request, jurors.clone(), now)
        .unwrap();
    for juror in &jurors {
        let hash = commitment_hash(CommitScheme::Blake2b256, true, "pw", juror);
        engine
            .submit_commitment(id, candidate, juror, hash, now)
            .unwrap();
    }
    let reveal_at = engine.session_view(id, now).unwrap().commit_end;

    thread::scope(|scope| {
        for juror in &jurors {
            let engine = &engine;
            scope.spawn(move || {
                engine
                    .submit_reveal(
                        id,
                        juror,
                        RevealSubmission::new(candidate, true, "pw"),
                        reveal_at,
                    )
                    .unwrap();
            });
        }
    });

    let result = engine.compute_result(id, candidate).unwrap();
    assert_eq!(result.approvals, 9);
    assert_eq!(result.total_reveals, 9);
    assert!(engine.non_revealers(id, candidate).unwrap().is_empty());
}
