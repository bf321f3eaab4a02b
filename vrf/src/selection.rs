//! Deterministic juror selection from VRF output.

use vetting_types::JurorAddress;

/// Selects jurors from a pool of eligible addresses.
pub struct JurySelector;

impl JurySelector {
    /// Select `count` distinct jurors from `pool` using `seed`.
    ///
    /// Every distinct pool member is scored with `blake2b(seed || address)` and
    /// the `count` lowest scores win. Any party holding the seed and the pool
    /// can recompute the jury.
    pub fn select(&self, seed: &[u8; 32], pool: &[JurorAddress], count: usize) -> Vec<JurorAddress> {
        let mut unique: Vec<&JurorAddress> = pool.iter().collect();
        unique.sort();
        unique.dedup();

        let mut scored: Vec<([u8; 32], &JurorAddress)> = unique
            .into_iter()
            .map(|addr| {
                let score = vetting_crypto::blake2b_256_multi(&[seed, addr.as_str().as_bytes()]);
                (score, addr)
            })
            .collect();

        scored.sort_by(|a, b| a.0.cmp(&b.0));
        scored.truncate(count);
        scored.into_iter().map(|(_, addr)| addr.clone()).collect()
    }
}
