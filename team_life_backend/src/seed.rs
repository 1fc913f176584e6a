//! Random source for birth tie-breaks and randomize.
//!
//! The core only sees the `RandomSource` trait. `SeedRng` hashes
//! `seed || nonce` with SHA-256 for every draw, so a fixed seed replays the
//! exact same game. The canister seeds it from the clock at init and
//! replaces the seed with `raw_rand` bytes once the management canister
//! answers.

use sha2::{Digest, Sha256};

// =============================================================================
// TRAIT
// =============================================================================

pub trait RandomSource {
    fn next_u64(&mut self) -> u64;

    /// Uniform index in `0..n`; `n` must be non-zero.
    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Uniform float in `[0, 1)` from the top 53 bits
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

// =============================================================================
// SEEDED HASH RNG
// =============================================================================

#[derive(Clone, Debug)]
pub struct SeedRng {
    seed: [u8; 32],
    nonce: u64,
}

impl SeedRng {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self { seed, nonce: 0 }
    }

    pub fn from_u64(seed: u64) -> Self {
        Self::from_bytes(&seed.to_be_bytes())
    }

    /// Hash arbitrary entropy (e.g. `raw_rand` output) down to a seed
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self::from_seed(hasher.finalize().into())
    }

    /// Hex SHA-256 of the current seed, safe to publish
    pub fn seed_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.seed);
        format!("{:x}", hasher.finalize())
    }

    pub fn draws(&self) -> u64 {
        self.nonce
    }
}

impl RandomSource for SeedRng {
    fn next_u64(&mut self) -> u64 {
        self.nonce += 1;
        let mut hasher = Sha256::new();
        hasher.update(self.seed);
        hasher.update(self.nonce.to_be_bytes());
        let hash = hasher.finalize();
        let mut word = [0u8; 8];
        word.copy_from_slice(&hash[0..8]);
        u64::from_be_bytes(word)
    }
}
