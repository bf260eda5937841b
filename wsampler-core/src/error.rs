//! Error taxonomy for sampler construction, refresh, and sampling.

use thiserror::Error;

/// Errors from sampler operations.
///
/// Construction and refresh fail fast on contract violations. Sampling only
/// fails where continuing would read outside a collection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("index {index} out of range for population of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

impl SamplerError {
    pub(crate) fn missing_weight_fn() -> Self {
        SamplerError::InvalidArgument("refresh requires a weight function (manual mode)".into())
    }

    pub(crate) fn non_finite_sum(sum: f64) -> Self {
        SamplerError::InvalidArgument(format!(
            "weights must sum to a finite value (got {sum}); check for infinite or huge weights"
        ))
    }

    pub(crate) fn empty_snapshot() -> Self {
        SamplerError::InvalidOperation("cannot sample from an empty weight snapshot".into())
    }
}
