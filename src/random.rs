//! Seedable random source.
//!
//! [`RandomSource`] is an explicit value passed to the annealing engine
//! instead of a process-wide generator. Every run that must be reproducible
//! or that runs next to other runs gets its own instance.
//!
//! The generator is [`SmallRng`] (xoshiro256++ on 64-bit targets). Only the
//! draw interface is relied upon: a 64-bit value for index selection, a
//! unit-interval value for acceptance tests, and (re)seeding.

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use thiserror::Error;

/// Failure to interpret a textual seed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeedParseError {
    #[error("seed is empty")]
    Empty,

    #[error("'{0}' is not a 64-bit hexadecimal seed")]
    InvalidHex(String),
}

/// A seedable uniform generator.
///
/// # Examples
///
/// ```
/// use u_maxwsat::random::RandomSource;
///
/// let mut a = RandomSource::from_seed(7);
/// let mut b = RandomSource::from_seed_str("0x7").unwrap();
/// assert_eq!(a.next_u64(), b.next_u64());
///
/// let u = a.next_unit();
/// assert!((0.0..1.0).contains(&u));
/// ```
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: SmallRng,
    seed: Option<u64>,
}

impl RandomSource {
    /// Creates a generator from a 64-bit seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Creates a generator from a raw 256-bit state.
    ///
    /// An all-zero state is a fixed point of xoshiro generators; the
    /// underlying implementation replaces it with a valid state.
    pub fn from_state(state: [u64; 4]) -> Self {
        Self {
            rng: SmallRng::from_seed(state_to_seed(state)),
            seed: None,
        }
    }

    /// Parses a hexadecimal seed such as `"0xdeadbeef"` or `"DEADBEEF"`.
    pub fn from_seed_str(text: &str) -> Result<Self, SeedParseError> {
        parse_seed(text).map(Self::from_seed)
    }

    /// Creates a generator from a seed drawn from the thread-local generator.
    ///
    /// The seed is kept so that the run can be reproduced later.
    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }

    /// The seed this generator was last seeded with, if it was seeded from
    /// a 64-bit value.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Restarts the stream from a 64-bit seed.
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::from_seed(seed);
    }

    /// Restarts the stream from a raw 256-bit state.
    pub fn reseed_from_state(&mut self, state: [u64; 4]) {
        *self = Self::from_state(state);
    }

    /// Draws a uniform 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Draws a uniform value in `[0, 1)` built from the top 53 bits.
    pub fn next_unit(&mut self) -> f64 {
        (self.rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Draws an index in `0..bound` by reduction modulo `bound`.
    ///
    /// # Panics
    ///
    /// Panics if `bound` is zero.
    pub fn index_below(&mut self, bound: usize) -> usize {
        assert!(bound > 0, "index_below requires a positive bound");
        (self.next_u64() % bound as u64) as usize
    }
}

impl RngCore for RandomSource {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.rng.fill_bytes(dst)
    }
}

/// Parses a 64-bit hexadecimal seed with an optional `0x` prefix.
pub fn parse_seed(text: &str) -> Result<u64, SeedParseError> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() {
        return Err(SeedParseError::Empty);
    }
    u64::from_str_radix(digits, 16).map_err(|_| SeedParseError::InvalidHex(text.to_string()))
}

fn state_to_seed(state: [u64; 4]) -> <SmallRng as SeedableRng>::Seed {
    let mut seed = <SmallRng as SeedableRng>::Seed::default();
    for (chunk, word) in seed.as_mut().chunks_mut(8).zip(state) {
        let bytes = word.to_le_bytes();
        chunk.copy_from_slice(&bytes[..chunk.len()]);
    }
    seed
}
