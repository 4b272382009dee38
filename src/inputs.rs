//! Seeded input generation.
//!
//! Random inputs are always derived from an explicit `u64` seed so that a
//! "randomize" action can be reported and reproduced later.

use rand_chacha::ChaCha8Rng;
use rand_core::{OsRng, RngCore, SeedableRng};

#[derive(Debug, Clone)]
pub struct InputRng {
    seed: u64,
    rng: ChaCha8Rng,
}

impl InputRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Fresh seed from the operating system.
    pub fn fresh_seed() -> u64 {
        OsRng.next_u64()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform value in `0..n`. `n` must be non-zero.
    pub fn below(&mut self, n: u64) -> u64 {
        debug_assert!(n > 0);
        self.rng.next_u64() % n
    }

    /// Uniform value in `lo..=hi`.
    pub fn range_i64(&mut self, lo: i64, hi: i64) -> i64 {
        let span = (hi - lo) as u64 + 1;
        lo + self.below(span) as i64
    }

    pub fn range_usize(&mut self, lo: usize, hi: usize) -> usize {
        lo + self.below((hi - lo) as u64 + 1) as usize
    }

    pub fn chance(&mut self, numerator: u64, denominator: u64) -> bool {
        self.below(denominator) < numerator
    }

    pub fn vec_i64(&mut self, len: usize, lo: i64, hi: i64) -> Vec<i64> {
        (0..len).map(|_| self.range_i64(lo, hi)).collect()
    }

    /// `len` distinct values from `lo..=hi`, in generation order.
    pub fn distinct_i64(&mut self, len: usize, lo: i64, hi: i64) -> Vec<i64> {
        let mut out = Vec::with_capacity(len);
        let available = (hi - lo + 1).max(0) as usize;
        while out.len() < len.min(available) {
            let v = self.range_i64(lo, hi);
            if !out.contains(&v) {
                out.push(v);
            }
        }
        out
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len() as u64) as usize]
    }
}
