//! LMDB database integrity checks.
//!
//! Run on startup to detect corruption early, before the engine starts
//! accepting commitments.

use std::sync::Arc;

use heed::types::Bytes;
use heed::Env;
use vetting_types::VettingSession;

use crate::environment::DATABASES;
use crate::LmdbError;

/// Summary of an integrity check run.
#[derive(Debug, Default)]
pub struct IntegrityReport {
    pub databases_checked: u32,
    pub total_entries: u64,
    pub sessions_decoded: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check LMDB database integrity.
///
/// Opens each expected database and counts its entries, then decodes every
/// session record. Read failures are recorded in the report rather than
/// causing a hard error.
pub fn check_integrity(env: &Arc<Env>) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport::default();
    let rtxn = env.read_txn()?;

    for &db_name in DATABASES {
        match env.open_database::<Bytes, Bytes>(&rtxn, Some(db_name)) {
            Ok(Some(db)) => {
                report.databases_checked += 1;
                match db.len(&rtxn) {
                    Ok(count) => report.total_entries += count,
                    Err(e) => report
                        .errors
                        .push(format!("failed to read database '{db_name}': {e}")),
                }
            }
            // Fresh environment.
            Ok(None) => {}
            Err(e) => report
                .errors
                .push(format!("failed to open database '{db_name}': {e}")),
        }
    }

    if let Ok(Some(sessions)) = env.open_database::<Bytes, Bytes>(&rtxn, Some("sessions")) {
        for entry in sessions.iter(&rtxn)? {
            let (key, value) = entry?;
            match bincode::deserialize::<VettingSession>(value) {
                Ok(session) if session.id.to_be_bytes().as_slice() == key => {
                    report.sessions_decoded += 1
                }
                Ok(session) => report
                    .errors
                    .push(format!("{} stored under a foreign key", session.id)),
                Err(e) => report
                    .errors
                    .push(format!("undecodable session record: {e}")),
            }
        }
    }

    if report.is_healthy() {
        tracing::info!(
            databases = report.databases_checked,
            entries = report.total_entries,
            "LMDB integrity check passed"
        );
    } else {
        tracing::warn!(errors = report.errors.len(), "LMDB integrity check found problems");
    }
    Ok(report)
}
