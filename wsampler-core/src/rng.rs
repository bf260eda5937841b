//! Uniform random sources and deterministic seed derivation.
//!
//! The sampler consumes draws in `[0, 1)` through [`UniformSource`] and never
//! seeds or reseeds the generator behind it. [`DefaultSource`] is the shared
//! per-thread generator used when the caller supplies nothing.
//!
//! [`SeedTree`] expands a master seed into labelled sub-seeds via BLAKE3, so
//! independent samplers get reproducible streams regardless of the order in
//! which they are created.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

use crate::error::SamplerError;

/// A capability producing uniform reals in `[0, 1)`.
pub trait UniformSource {
    fn next_uniform(&mut self) -> f64;
}

impl<U: UniformSource + ?Sized> UniformSource for &mut U {
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }
}

impl<U: UniformSource + ?Sized> UniformSource for Box<U> {
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }
}

/// Handle to the process-wide (per-thread) generator from `rand`.
///
/// Lazily seeded from OS entropy on first use. Not `Send`: give each thread
/// its own [`SeededSource`] instead.
#[derive(Debug, Clone, Default)]
pub struct DefaultSource {
    rng: ThreadRng,
}

impl DefaultSource {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl UniformSource for DefaultSource {
    fn next_uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// An explicitly seeded `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl UniformSource for SeededSource {
    fn next_uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of draws, wrapping around at the end.
///
/// Used for deterministic replay: a stratified sequence such as
/// `(i + 0.5) / n` turns sampling into an exact quota allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedSequence {
    values: Vec<f64>,
    cursor: usize,
}

impl FixedSequence {
    pub fn new(values: Vec<f64>) -> Result<Self, SamplerError> {
        if values.is_empty() {
            return Err(SamplerError::InvalidArgument(
                "fixed sequence needs at least one value".into(),
            ));
        }
        if let Some(bad) = values.iter().find(|v| !(0.0..1.0).contains(*v)) {
            return Err(SamplerError::InvalidArgument(format!(
                "fixed sequence value {bad} is outside [0, 1)"
            )));
        }
        Ok(Self { values, cursor: 0 })
    }

    /// `n` evenly spaced midpoints: `0.5/n, 1.5/n, ..., (n - 0.5)/n`.
    pub fn stratified(n: usize) -> Result<Self, SamplerError> {
        let values = (0..n).map(|i| (i as f64 + 0.5) / n as f64).collect();
        Self::new(values)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl UniformSource for FixedSequence {
    fn next_uniform(&mut self) -> f64 {
        let value = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        value
    }
}

/// Deterministic seed hierarchy.
///
/// Sub-seeds are a pure function of `(master_seed, label, index)`; deriving
/// them in any order produces the same values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedTree {
    master_seed: u64,
}

impl SeedTree {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derive the sub-seed for `(label, index)`.
    pub fn sub_seed(&self, label: &str, index: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(label.as_bytes());
        hasher.update(&index.to_le_bytes());
        let hash = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(head)
    }

    pub fn source_for(&self, label: &str, index: u64) -> SeededSource {
        SeededSource::from_seed(self.sub_seed(label, index))
    }
}
