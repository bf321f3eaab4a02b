//! Nullable random: deterministic random number generation.

use std::sync::{Mutex, PoisonError};
use vetting_oracle::{OracleError, RandomOutput, VrfProvider};

/// A deterministic VRF provider for testing.
///
/// Returns pre-configured values in order, cycling when exhausted.
pub struct NullRandom {
    outputs: Vec<[u8; 32]>,
    index: Mutex<usize>,
    fail_on: Option<usize>,
}

impl NullRandom {
    /// Create with a sequence of deterministic random values.
    pub fn new(outputs: Vec<[u8; 32]>) -> Self {
        Self {
            outputs,
            index: Mutex::new(0),
            fail_on: None,
        }
    }

    /// Make the `call`-th request (counting from zero) fail once.
    pub fn failing_on_call(mut self, call: usize) -> Self {
        self.fail_on = Some(call);
        self
    }

    /// Create with a single value that will be returned for every call.
    pub fn constant(value: [u8; 32]) -> Self {
        Self::new(vec![value])
    }
}

impl VrfProvider for NullRandom {
    fn get_randomness(&self, _context: &[u8]) -> Result<RandomOutput, OracleError> {
        if self.outputs.is_empty() {
            return Err(OracleError::Randomness("no values configured".into()));
        }
        let mut idx = self.index.lock().unwrap_or_else(PoisonError::into_inner);
        let call = *idx;
        *idx += 1;
        if self.fail_on == Some(call) {
            return Err(OracleError::Randomness(format!("call {call} configured to fail")));
        }
        let current = call % self.outputs.len();
        Ok(RandomOutput {
            value: self.outputs[current],
            proof: Vec::new(),
            round: current as u64,
        })
    }

    fn verify(&self, _context: &[u8], _output: &RandomOutput) -> Result<bool, OracleError> {
        Ok(true) // Always valid in test mode
    }

    fn name(&self) -> &str {
        "null-random"
    }
}
