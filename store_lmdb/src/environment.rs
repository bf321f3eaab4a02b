//! LMDB environment setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::store::LmdbVettingStore;
use crate::LmdbError;

/// Named databases the vetting store keeps in one environment.
pub const DATABASES: &[&str] = &[
    "sessions",
    "meta",
    "commitments",
    "reveals",
    "tallies",
    "stakes",
    "results",
];

/// Wraps the LMDB environment shared by every store handle.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    path: PathBuf,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    ///
    /// The directory is created if missing. `max_dbs` must cover
    /// [`DATABASES`].
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        let mut options = EnvOpenOptions::new();
        options.map_size(map_size).max_dbs(max_dbs);
        // SAFETY: each environment directory is opened once per process; the
        // caller owns `path` for the lifetime of the returned value.
        let env = unsafe { options.open(path)? };
        tracing::debug!(path = %path.display(), map_size, max_dbs, "opened LMDB environment");
        Ok(Self {
            env: Arc::new(env),
            path: path.to_path_buf(),
        })
    }

    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create (if needed) every vetting database and return a store over them.
    pub fn vetting_store(&self) -> Result<LmdbVettingStore, LmdbError> {
        let mut wtxn = self.env.write_txn()?;
        let mut open = |name: &str| -> Result<Database<Bytes, Bytes>, LmdbError> {
            Ok(self.env.create_database(&mut wtxn, Some(name))?)
        };
        let store = LmdbVettingStore {
            env: Arc::clone(&self.env),
            sessions_db: open("sessions")?,
            meta_db: open("meta")?,
            commitments_db: open("commitments")?,
            reveals_db: open("reveals")?,
            tallies_db: open("tallies")?,
            stakes_db: open("stakes")?,
            results_db: open("results")?,
        };
        wtxn.commit()?;
        Ok(store)
    }
}
