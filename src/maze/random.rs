//! Injected randomness for maze generation
//!
//! Generation never reaches for an ambient RNG. Callers hand in a
//! [`RandomSource`], which is either seeded (PCG32) or a replay of
//! previously recorded draws.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniform integers
pub trait RandomSource {
    /// Uniform integer in `[0, bound)`. Callers never pass `bound == 0`.
    fn next_int(&mut self, bound: usize) -> usize;

    /// Fisher-Yates shuffle, filling slots from the back of the slice.
    ///
    /// A slice of length `n` consumes exactly `n` draws with bounds
    /// `n, n-1, .., 1`.
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        let mut counter = items.len();
        while counter > 0 {
            let index = self.next_int(counter);
            counter -= 1;
            items.swap(counter, index);
        }
    }
}

/// Seeded PCG32 source, reproducible across platforms
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: Pcg32,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn next_int(&mut self, bound: usize) -> usize {
        self.rng.random_range(0..bound)
    }
}

/// Replays a fixed sequence of draws.
///
/// Each value is reduced modulo the requested bound. The sequence wraps
/// around once exhausted, and an empty sequence always yields 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: Vec<usize>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: impl Into<Vec<usize>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Number of draws served so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_int(&mut self, bound: usize) -> usize {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value % bound
    }
}

/// Wraps another source and records every value it hands out
#[derive(Debug, Clone)]
pub struct RecordingRandom<R> {
    inner: R,
    trace: Vec<usize>,
}

impl<R: RandomSource> RecordingRandom<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            trace: Vec::new(),
        }
    }

    pub fn trace(&self) -> &[usize] {
        &self.trace
    }

    /// Consume the recorder, returning the draws in order
    pub fn into_trace(self) -> Vec<usize> {
        self.trace
    }
}

impl<R: RandomSource> RandomSource for RecordingRandom<R> {
    fn next_int(&mut self, bound: usize) -> usize {
        let value = self.inner.next_int(bound);
        self.trace.push(value);
        value
    }
}
