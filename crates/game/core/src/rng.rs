//! Deterministic random rolls.
//!
//! Every random draw of an encounter comes from a [`Dice`] stream seeded by
//! [`compute_seed`] from the encounter seed, the action nonce, the acting slot
//! and a context value. Given the same seed the same combat unfolds.

/// PCG-XSH-RR stream producing 32-bit output from 64-bit state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dice {
    state: u64,
}

impl Dice {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Advance the LCG state: `state' = state × multiplier + increment (mod 2^64)`.
    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = Self::step(self.state);
        Self::output(self.state)
    }

    /// Uniform value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0)
    }

    /// Uniform index in `[0, len)`; `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "index() requires a non-empty range");
        ((self.next_f64() * len as f64) as usize).min(len.saturating_sub(1))
    }
}

/// Mixes the encounter seed with per-roll entropy.
///
/// # Context Values
///
/// - `0`: ability effect rolls
/// - `1`: initial turn order rolls
pub fn compute_seed(seed: u64, nonce: u64, slot_code: u32, context: u32) -> u64 {
    let mut hash = seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= u64::from(slot_code).wrapping_mul(0x517cc1b727220a95);
    hash ^= u64::from(context).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
