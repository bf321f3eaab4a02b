//! A full vetting session against the LMDB store, driven by a virtual clock.
//!
//! create → request jury → oracle fulfils over the channel → stake → commit
//! → reveal (one juror stays silent) → finalize.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use vetting_crypto::{commitment_hash, Secret};
use vetting_jury::{drive_fulfilments, RevealSubmission, SessionSpec, VettingEngine};
use vetting_oracle::{fulfilment_channel, LocalVrf, VrfJuryOracle};
use vetting_store_lmdb::{check_integrity, LmdbEnvironment};
use vetting_types::{
    CandidateId, ElectionId, JurorAddress, SessionId, Timestamp, VettingResult,
};
use vetting_utils::format_duration;

use crate::{CliError, VettingConfig};

const DEMO_MAX_DBS: u32 = 16;

#[derive(Clone, Debug)]
pub struct DemoOptions {
    pub candidates: u64,
    pub jury_size: u32,
    /// Per-juror stake; 0 disables staking.
    pub stake: u128,
    /// Fixed VRF seed for a reproducible jury. `None` draws from the OS.
    pub seed: Option<[u8; 32]>,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            candidates: 2,
            jury_size: 5,
            stake: 0,
            seed: None,
        }
    }
}

/// What the demo did, for printing or inspection.
#[derive(Clone, Debug, Serialize)]
pub struct DemoReport {
    pub session: SessionId,
    pub jurors: Vec<JurorAddress>,
    pub results: Vec<VettingResult>,
    /// Committed-but-silent jurors per candidate.
    pub non_revealers: Vec<(CandidateId, Vec<JurorAddress>)>,
    pub events: usize,
}

/// Parse a 32-byte hex seed (optional `0x`).
pub fn parse_seed(hex_seed: &str) -> Result<[u8; 32], CliError> {
    let digits = hex_seed.strip_prefix("0x").unwrap_or(hex_seed);
    let bytes = hex::decode(digits).map_err(|e| CliError::Seed(e.to_string()))?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| CliError::Seed(format!("expected 32 bytes, got {}", b.len())))
}

/// Generated pool of EVM-style addresses `0x…01`, `0x…02`, …
fn generated_pool(size: usize) -> Vec<JurorAddress> {
    (1..=size)
        .map(|i| JurorAddress::new(format!("0x{i:040x}")))
        .collect()
}

/// Deterministic stand-in for a juror's judgement.
fn demo_decision(juror_index: usize, candidate: CandidateId) -> bool {
    (juror_index as u64 + candidate.get()) % 3 != 0
}

pub async fn run_demo(
    config: &VettingConfig,
    options: &DemoOptions,
) -> anyhow::Result<DemoReport> {
    let env = LmdbEnvironment::open(&config.data_dir, DEMO_MAX_DBS, config.lmdb_map_size)?;
    let store = Arc::new(env.vetting_store()?);
    let report = check_integrity(env.env())?;
    if !report.is_healthy() {
        anyhow::bail!("data directory failed integrity check: {:?}", report.errors);
    }

    let pool = if config.juror_pool.is_empty() {
        generated_pool(options.jury_size as usize * 2)
    } else {
        config
            .juror_pool
            .iter()
            .map(JurorAddress::parse)
            .collect::<Result<Vec<_>, _>>()?
    };
    let vrf = match options.seed {
        Some(seed) => LocalVrf::new(seed),
        None => LocalVrf::from_entropy()?,
    };
    let oracle = Arc::new(VrfJuryOracle::new(vrf, pool));
    let engine = Arc::new(VettingEngine::new(
        store,
        Arc::clone(&oracle),
        config.params.clone(),
    ));

    let clock = Arc::new(AtomicU64::new(Timestamp::now().as_secs()));
    let now = {
        let clock = Arc::clone(&clock);
        move || Timestamp::new(clock.load(Ordering::SeqCst))
    };

    // Create and request the jury.
    let creator = JurorAddress::new(format!("0x{}", "c0".repeat(20)));
    let candidates: Vec<CandidateId> = (1..=options.candidates).map(CandidateId::new).collect();
    let params = engine.params();
    let spec = SessionSpec::new(ElectionId::new(1), candidates.clone(), options.jury_size)
        .with_durations(
            params.min_commit_duration_secs.max(600),
            params.min_reveal_duration_secs.max(600),
        )
        .with_stake(options.stake);
    let session_id = engine.create_session(&creator, &spec, now())?;
    engine.request_jury_selection(&creator, session_id, now())?;

    // The oracle answers over the channel; the driver applies it.
    let (tx, rx) = fulfilment_channel(8);
    let driver = {
        let engine = Arc::clone(&engine);
        let now = now.clone();
        tokio::spawn(async move { drive_fulfilments(&*engine, rx, now).await })
    };
    clock.fetch_add(5, Ordering::SeqCst);
    oracle.deliver_pending(&tx).await?;
    drop(tx);
    let applied = driver.await?;
    if applied != 1 {
        anyhow::bail!("oracle fulfilment was not applied");
    }

    let view = engine.session_view(session_id, now())?;
    tracing::info!(
        session = %session_id,
        jurors = view.jurors.len(),
        commit_window = %format_duration(now().until(view.commit_end)),
        "jury seated"
    );

    // Commit phase: every juror stakes and commits for every candidate.
    let mut openings = Vec::new();
    for (index, juror) in view.jurors.iter().enumerate() {
        if options.stake > 0 {
            engine.stake_as_juror(session_id, juror, options.stake, now())?;
        }
        for candidate in &candidates {
            let decision = demo_decision(index, *candidate);
            let secret = Secret::generate()?;
            let hash = commitment_hash(view.scheme, decision, secret.expose(), juror);
            engine.submit_commitment(session_id, *candidate, juror, hash, now())?;
            openings.push((juror.clone(), *candidate, decision, secret));
        }
    }

    // Reveal phase: the last juror never reveals.
    clock.store(view.commit_end.as_secs(), Ordering::SeqCst);
    let silent = view.jurors.last().cloned();
    for (juror, candidate, decision, secret) in &openings {
        if Some(juror) == silent.as_ref() {
            continue;
        }
        let submission = RevealSubmission::new(*candidate, *decision, secret.expose())
            .with_evidence(format!("demo://{session_id}/{candidate}/{juror}"))
            .with_findings("reviewed public filings");
        engine.submit_reveal(session_id, juror, submission, now())?;
    }

    clock.store(view.reveal_end.as_secs(), Ordering::SeqCst);
    let results = engine.finalize(&creator, session_id, now())?;

    let mut non_revealers = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
        non_revealers.push((*candidate, engine.non_revealers(session_id, *candidate)?));
    }

    Ok(DemoReport {
        session: session_id,
        jurors: view.jurors,
        results,
        non_revealers,
        events: engine.drain_events().len(),
    })
}
