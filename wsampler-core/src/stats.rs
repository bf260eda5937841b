//! Goodness-of-fit for observed draw counts.

/// Pearson chi-squared statistic of `observed` counts against the
/// distribution implied by `weights`.
///
/// Buckets with zero expected count are skipped; they contribute nothing when
/// the sampler honours zero weights. Returns 0.0 if there are no draws or no
/// positive weight.
pub fn chi_squared(observed: &[u64], weights: &[f64]) -> f64 {
    let draws: u64 = observed.iter().sum();
    let total_weight: f64 = weights.iter().sum();
    if draws == 0 || total_weight <= 0.0 {
        return 0.0;
    }

    observed
        .iter()
        .zip(weights)
        .filter(|(_, w)| **w > 0.0)
        .map(|(&count, &w)| {
            let expected = draws as f64 * w / total_weight;
            let diff = count as f64 - expected;
            diff * diff / expected
        })
        .sum()
}

/// Degrees of freedom for [`chi_squared`]: positive-weight buckets minus one.
pub fn degrees_of_freedom(weights: &[f64]) -> usize {
    weights.iter().filter(|&&w| w > 0.0).count().saturating_sub(1)
}
