//! Rate-parameterized random sampling.
//!
//! The rate is not clamped: `draw < rate` with `draw` in `[0, 1)` already
//! makes `rate >= 1` always match and `rate <= 0` never match. A NaN rate
//! never matches (inverted: always matches).

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform random source shared by any number of concurrent samplers.
pub trait RandomSource: Send + Sync + fmt::Debug {
    /// One uniform draw in `[0, 1)`.
    fn next_f64(&self) -> f64;
}

/// Thread-local generator. Safe without locking.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn next_f64(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Seeded generator behind one lock, for reproducible runs.
///
/// The lock belongs to the source alone; it never interacts with the
/// periodic counter locks.
#[derive(Debug)]
pub struct SeededSource {
    rng: Mutex<StdRng>,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededSource {
    fn next_f64(&self) -> f64 {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen::<f64>()
    }
}

/// Stateless sampler: each decision is an independent draw.
#[derive(Debug, Clone)]
pub struct RandomSampler {
    rate: f64,
    invert: bool,
    source: Arc<dyn RandomSource>,
}

impl RandomSampler {
    /// Matches with probability `rate`.
    pub fn new(rate: f64) -> Self {
        Self {
            rate,
            invert: false,
            source: Arc::new(ThreadRngSource),
        }
    }

    /// Chaos form: `rate` is the pass-through probability, and the sampler
    /// matches on the draws that do NOT pass.
    pub fn pass_rate(rate: f64) -> Self {
        Self {
            invert: true,
            ..Self::new(rate)
        }
    }

    pub fn with_source(mut self, source: Arc<dyn RandomSource>) -> Self {
        self.source = source;
        self
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    pub fn decide(&self) -> bool {
        let hit = self.source.next_f64() < self.rate;
        hit != self.invert
    }
}
