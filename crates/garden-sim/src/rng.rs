//! Injectable randomness.
//!
//! Every random decision in the engine (forecast sampling, corn pairing,
//! spot choice) goes through [`RandomSource`], so a garden can be replayed
//! exactly from a seed or driven by a scripted sequence in tests.

use std::fmt;

/// Source of random numbers for the simulation.
pub trait RandomSource: fmt::Debug {
    /// Generate a random f32 in [0.0, 1.0).
    fn next_f32(&mut self) -> f32;

    /// Generate a random index in [0, len). `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize;
}

/// Shuffle a slice in place (Fisher-Yates) using the given source.
pub fn shuffle<T>(rng: &mut dyn RandomSource, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.next_index(i + 1);
        items.swap(i, j);
    }
}

/// Seeded random source backed by `fastrand`.
#[derive(Debug, Clone)]
pub struct FastRandom {
    rng: fastrand::Rng,
}

impl FastRandom {
    /// Create a source from a seed, or from entropy when `None`.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self { rng }
    }
}

impl RandomSource for FastRandom {
    fn next_f32(&mut self) -> f32 {
        self.rng.f32()
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.rng.usize(..len)
    }
}

/// Deterministic source replaying a fixed cycle of values.
///
/// An empty script always yields `0.0`, so every index draw picks 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    /// Create a source that cycles through `values` (each clamped to [0, 1)).
    #[must_use]
    pub fn new(values: Vec<f32>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.clamp(0.0, 0.999_999))
            .collect();
        Self { values, cursor: 0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f32(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }

    fn next_index(&mut self, len: usize) -> usize {
        let roll = self.next_f32();
        ((roll * len as f32) as usize).min(len.saturating_sub(1))
    }
}
