//! The demo session end to end against a temporary LMDB directory.

use vetting_cli::{run_demo, DemoOptions, VettingConfig};
use vetting_types::CandidateId;

fn config_in(dir: &tempfile::TempDir) -> VettingConfig {
    VettingConfig {
        data_dir: dir.path().join("data"),
        lmdb_map_size: 16 * 1024 * 1024,
        ..VettingConfig::default()
    }
}

#[tokio::test]
async fn demo_runs_a_full_session() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = config_in(&dir);
    let options = DemoOptions {
        seed: Some([7; 32]),
        ..DemoOptions::default()
    };

    let report = run_demo(&config, &options).await.expect("demo succeeds");
    assert_eq!(report.jurors.len(), 5);
    assert_eq!(report.results.len(), 2);

    for result in &report.results {
        // One of five jurors stays silent; the others split 3 to 1.
        assert_eq!(result.total_reveals, 4);
        assert_eq!(result.approvals, 3);
        assert_eq!(result.approval_percentage, 75);
        assert!(result.approved);
    }

    let silent = report.jurors.last().cloned().unwrap();
    for (candidate, jurors) in &report.non_revealers {
        assert!([CandidateId::new(1), CandidateId::new(2)].contains(candidate));
        assert_eq!(jurors, &vec![silent.clone()]);
    }

    // created + requested + selected + 10 commits + 8 reveals + finalized
    assert_eq!(report.events, 22);
}

#[tokio::test]
async fn demo_with_stake_and_reused_data_dir() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = config_in(&dir);
    let options = DemoOptions {
        stake: 1_000_000_000_000_000,
        seed: Some([9; 32]),
        ..DemoOptions::default()
    };

    let first = run_demo(&config, &options).await.expect("first run");
    let second = run_demo(&config, &options).await.expect("second run");
    assert_eq!(first.session.get() + 1, second.session.get());
    // 22 events plus five stakes
    assert_eq!(second.events, 27);
}
