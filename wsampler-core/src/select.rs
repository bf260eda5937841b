//! Cumulative selection over a weight array.
//!
//! Walk the weights in order, subtracting each from a roll drawn in
//! `[0, weight_sum)`, and stop at the first weight that exceeds what is left.
//! If the walk runs off the end (zero total weight, or rounding at the tail)
//! the last index is selected.

use crate::error::SamplerError;
use crate::population::Population;
use crate::rng::UniformSource;

/// Clamp a raw weight into the non-negative range. NaN maps to 0; `+inf` is
/// kept so the caller's sum check can reject it.
#[inline]
pub fn clamp_weight(raw: f64) -> f64 {
    if raw >= 0.0 {
        raw
    } else {
        0.0
    }
}

/// Pick an index given a roll in `[0, sum(weights))`.
///
/// Returns `None` only for an empty weight array.
#[inline]
pub fn select_cumulative(weights: &[f64], roll: f64) -> Option<usize> {
    let mut remaining = roll;
    for (index, &weight) in weights.iter().enumerate() {
        if weight > remaining {
            return Some(index);
        }
        remaining -= weight;
    }
    weights.len().checked_sub(1)
}

/// Single-call weighted choice without a persistent snapshot.
///
/// Computes every weight through `weight_fn` (clamped), draws once from `rng`,
/// and applies the same cumulative walk as [`WeightedSampler`]. A non-finite
/// weight sum fails with `InvalidArgument` before drawing.
///
/// [`WeightedSampler`]: crate::sampler::WeightedSampler
pub fn choose_weighted_index<P, F, R>(
    population: &P,
    weight_fn: F,
    rng: &mut R,
) -> Result<usize, SamplerError>
where
    P: Population + ?Sized,
    F: Fn(&P::Item) -> f64,
    R: UniformSource + ?Sized,
{
    let mut weights = Vec::with_capacity(population.len());
    let mut total = 0.0;
    population.for_each_item(|_, item| {
        let weight = clamp_weight(weight_fn(item));
        total += weight;
        weights.push(weight);
    });

    if !total.is_finite() {
        return Err(SamplerError::non_finite_sum(total));
    }

    let roll = rng.next_uniform() * total;
    select_cumulative(&weights, roll).ok_or_else(SamplerError::empty_snapshot)
}
