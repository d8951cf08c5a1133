//! Seeded random source
//!
//! Every player gets the same maze for a day-key, so the whole chain from text
//! to draws must be stable across platforms and releases.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Hash text to a seed (FNV-1a, 64-bit, over the UTF-8 bytes)
pub fn hash_to_seed(text: &str) -> u64 {
    text.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Deterministic generator of floats in [0, 1)
#[derive(Debug, Clone)]
pub struct SeededRng {
    rng: Pcg32,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(hash_to_seed(text))
    }

    /// Next draw in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Uniform index in [0, len). `len` must be non-zero.
    pub fn pick_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        let index = (self.next_f64() * len as f64) as usize;
        index.min(len.saturating_sub(1))
    }
}
