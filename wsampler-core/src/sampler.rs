//! Weighted sampler over a population with a cached weight snapshot.
//!
//! Construction takes an initial snapshot: one clamped weight per element plus
//! their sum. Sampling only reads the snapshot and one uniform draw. The
//! snapshot is replaced wholesale by [`WeightedSampler::refresh_weights`] and
//! never updated automatically, so after the caller mutates the population the
//! sampler stays [`SamplerState::Stale`] until it is refreshed.
//!
//! Without a weight function the sampler runs in manual mode: the snapshot
//! starts zero-filled and the caller maintains it through
//! [`WeightedSampler::assign_weights`] or the raw accessors.

use std::fmt;

use tracing::{debug, trace, warn};

use crate::error::SamplerError;
use crate::population::Population;
use crate::rng::{DefaultSource, UniformSource};
use crate::select::{clamp_weight, select_cumulative};

/// Owned weight function, element → real weight.
pub type WeightFn<T> = Box<dyn Fn(&T) -> f64>;

/// Whether the snapshot length agrees with the live population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    Ready,
    Stale,
}

/// Weighted random selection with an explicit refresh contract.
///
/// The probability of drawing index `i` is `weights[i] / weight_sum` as of the
/// last refresh. A zero `weight_sum` makes the last index deterministic.
pub struct WeightedSampler<P: Population, R = DefaultSource> {
    source: P,
    weight_fn: Option<WeightFn<P::Item>>,
    weights: Vec<f64>,
    weight_sum: f64,
    rng: R,
}

impl<P: Population> WeightedSampler<P, DefaultSource> {
    /// Sampler over `source` using the shared default random source.
    ///
    /// Fails with `InvalidArgument` if the initial snapshot has a non-finite sum.
    pub fn new<F>(source: P, weight_fn: F) -> Result<Self, SamplerError>
    where
        F: Fn(&P::Item) -> f64 + 'static,
    {
        Self::with_rng(source, weight_fn, DefaultSource::new())
    }

    /// Manual-mode sampler: zero-filled snapshot, no weight function.
    pub fn manual(source: P) -> Self {
        Self::manual_with_rng(source, DefaultSource::new())
    }

    pub fn builder() -> SamplerBuilder<P, DefaultSource> {
        SamplerBuilder::new()
    }
}

impl<P: Population, R: UniformSource> WeightedSampler<P, R> {
    pub fn with_rng<F>(source: P, weight_fn: F, rng: R) -> Result<Self, SamplerError>
    where
        F: Fn(&P::Item) -> f64 + 'static,
    {
        Self::from_parts(source, Some(Box::new(weight_fn)), rng)
    }

    pub fn manual_with_rng(source: P, rng: R) -> Self {
        Self {
            weights: vec![0.0; source.len()],
            source,
            weight_fn: None,
            weight_sum: 0.0,
            rng,
        }
    }

    fn from_parts(
        source: P,
        weight_fn: Option<WeightFn<P::Item>>,
        rng: R,
    ) -> Result<Self, SamplerError> {
        let weights = vec![0.0; source.len()];
        let mut sampler = Self {
            source,
            weight_fn,
            weights,
            weight_sum: 0.0,
            rng,
        };
        if let Some(weight_fn) = sampler.weight_fn.as_deref() {
            sampler.weight_sum = recompute(&sampler.source, weight_fn, &mut sampler.weights)?;
        }
        Ok(sampler)
    }

    /// Recompute every weight from the current population.
    ///
    /// Resizes the snapshot if the population length changed, then evaluates
    /// the weight function for each element in index order, clamping negative
    /// (and NaN) results to zero. Fails with `InvalidArgument` in manual mode,
    /// or when the weights sum to a non-finite value (an infinite weight or
    /// overflow); the snapshot is then zeroed and must be refreshed again.
    pub fn refresh_weights(&mut self) -> Result<&mut Self, SamplerError> {
        let weight_fn = self
            .weight_fn
            .as_deref()
            .ok_or_else(SamplerError::missing_weight_fn)?;
        match recompute(&self.source, weight_fn, &mut self.weights) {
            Ok(sum) => {
                self.weight_sum = sum;
                Ok(self)
            }
            Err(err) => {
                self.weight_sum = 0.0;
                Err(err)
            }
        }
    }

    /// Draw an index from the current snapshot.
    ///
    /// No staleness check: the index is valid for the snapshot, which may not
    /// match a population that changed since the last refresh.
    pub fn sample_index(&mut self) -> Result<usize, SamplerError> {
        if self.weights.is_empty() {
            return Err(SamplerError::empty_snapshot());
        }
        let roll = self.rng.next_uniform() * self.weight_sum;
        select_cumulative(&self.weights, roll).ok_or_else(SamplerError::empty_snapshot)
    }

    /// Draw an element and clone it out of the population.
    pub fn sample(&mut self) -> Result<P::Item, SamplerError>
    where
        P::Item: Clone,
    {
        self.sample_with(Clone::clone)
    }

    /// Draw an element and visit it by reference.
    ///
    /// Fails with `IndexOutOfRange` if the population shrank below the
    /// snapshot length since the last refresh.
    pub fn sample_with<U>(&mut self, f: impl FnOnce(&P::Item) -> U) -> Result<U, SamplerError> {
        let index = self.sample_index()?;
        self.source
            .with_item(index, f)
            .ok_or_else(|| SamplerError::IndexOutOfRange {
                index,
                len: self.source.len(),
            })
    }

    pub fn sample_indices(&mut self, n: usize) -> Result<Vec<usize>, SamplerError> {
        (0..n).map(|_| self.sample_index()).collect()
    }

    /// Histogram of `n` draws, one bucket per snapshot entry.
    pub fn frequencies(&mut self, n: usize) -> Result<Vec<u64>, SamplerError> {
        let mut counts = vec![0u64; self.weights.len()];
        for _ in 0..n {
            let index = self.sample_index()?;
            counts[index] += 1;
        }
        Ok(counts)
    }

    /// Selection probability of `index` under the current snapshot.
    pub fn probability(&self, index: usize) -> Option<f64> {
        let weight = *self.weights.get(index)?;
        if self.weight_sum > 0.0 {
            Some(weight / self.weight_sum)
        } else if index + 1 == self.weights.len() {
            Some(1.0)
        } else {
            Some(0.0)
        }
    }

    /// Replace the snapshot in manual mode (or override a computed one).
    ///
    /// The new weights must cover the current population exactly and sum to a
    /// finite value. Entries are clamped and the sum recomputed. On failure the
    /// previous snapshot is kept.
    pub fn assign_weights(&mut self, mut weights: Vec<f64>) -> Result<&mut Self, SamplerError> {
        let expected = self.source.len();
        if weights.len() != expected {
            return Err(SamplerError::InvalidArgument(format!(
                "got {} weights for a population of length {expected}",
                weights.len()
            )));
        }
        let mut sum = 0.0;
        for weight in &mut weights {
            *weight = clamp_weight(*weight);
            sum += *weight;
        }
        if !sum.is_finite() {
            return Err(SamplerError::non_finite_sum(sum));
        }
        self.weights = weights;
        self.weight_sum = sum;
        debug!(len = expected, weight_sum = sum, "assigned weight snapshot");
        Ok(self)
    }

    /// Raw snapshot access. Keeping `weight_sum` consistent is the caller's job.
    pub fn weights_mut(&mut self) -> &mut [f64] {
        &mut self.weights
    }

    pub fn set_weight_sum(&mut self, weight_sum: f64) {
        self.weight_sum = weight_sum;
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn weight_sum(&self) -> f64 {
        self.weight_sum
    }

    /// Snapshot length (not the live population length).
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Only length drift is detectable; edits that keep the length are not.
    pub fn state(&self) -> SamplerState {
        if self.weights.len() == self.source.len() {
            SamplerState::Ready
        } else {
            SamplerState::Stale
        }
    }

    pub fn is_stale(&self) -> bool {
        self.state() == SamplerState::Stale
    }

    pub fn has_weight_fn(&self) -> bool {
        self.weight_fn.is_some()
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    /// Mutable access to the population. Does not refresh.
    pub fn source_mut(&mut self) -> &mut P {
        &mut self.source
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    pub fn into_source(self) -> P {
        self.source
    }
}

impl<P, R> fmt::Debug for WeightedSampler<P, R>
where
    P: Population + fmt::Debug,
    R: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeightedSampler")
            .field("source", &self.source)
            .field("has_weight_fn", &self.weight_fn.is_some())
            .field("weights", &self.weights)
            .field("weight_sum", &self.weight_sum)
            .field("rng", &self.rng)
            .finish()
    }
}

/// Rewrite `weights` from `source` and return their sum. A non-finite sum
/// zeroes the snapshot and fails.
fn recompute<P>(
    source: &P,
    weight_fn: &dyn Fn(&P::Item) -> f64,
    weights: &mut Vec<f64>,
) -> Result<f64, SamplerError>
where
    P: Population + ?Sized,
{
    let len = source.len();
    let resized = weights.len() != len;
    if resized {
        weights.clear();
        weights.resize(len, 0.0);
    }

    let mut sum = 0.0;
    source.for_each_item(|index, item| {
        let raw = weight_fn(item);
        let weight = clamp_weight(raw);
        if weight != raw {
            trace!(index, raw, "clamped weight to zero");
        }
        weights[index] = weight;
        sum += weight;
    });

    if !sum.is_finite() {
        weights.fill(0.0);
        warn!(len, weight_sum = sum, "weight sum is not finite; snapshot zeroed");
        return Err(SamplerError::non_finite_sum(sum));
    }

    debug!(len, weight_sum = sum, resized, "refreshed weight snapshot");
    if len > 0 && sum == 0.0 {
        warn!(len, "all weights are zero; sampling will always select the last index");
    }
    Ok(sum)
}

/// Step-by-step construction with an explicit "no source" failure.
pub struct SamplerBuilder<P: Population, R = DefaultSource> {
    source: Option<P>,
    weight_fn: Option<WeightFn<P::Item>>,
    rng: R,
}

impl<P: Population> SamplerBuilder<P, DefaultSource> {
    pub fn new() -> Self {
        Self {
            source: None,
            weight_fn: None,
            rng: DefaultSource::new(),
        }
    }
}

impl<P: Population> Default for SamplerBuilder<P, DefaultSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Population, R: UniformSource> SamplerBuilder<P, R> {
    pub fn source(mut self, source: P) -> Self {
        self.source = Some(source);
        self
    }

    pub fn weight_fn<F>(mut self, weight_fn: F) -> Self
    where
        F: Fn(&P::Item) -> f64 + 'static,
    {
        self.weight_fn = Some(Box::new(weight_fn));
        self
    }

    pub fn rng<R2: UniformSource>(self, rng: R2) -> SamplerBuilder<P, R2> {
        SamplerBuilder {
            source: self.source,
            weight_fn: self.weight_fn,
            rng,
        }
    }

    /// Fails with `InvalidArgument` if no source was supplied or the initial
    /// snapshot has a non-finite sum.
    pub fn build(self) -> Result<WeightedSampler<P, R>, SamplerError> {
        let source = self.source.ok_or_else(|| {
            SamplerError::InvalidArgument("sampler requires a source collection".into())
        })?;
        WeightedSampler::from_parts(source, self.weight_fn, self.rng)
    }
}
