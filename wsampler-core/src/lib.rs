//! wsampler core — weighted random selection over ordered collections.
//!
//! This crate contains:
//! - The weighted sampler with its cached weight snapshot and refresh contract
//! - The cumulative selection walk and a single-call variant
//! - The population abstraction (slices, vectors, shared handles)
//! - Uniform random sources and BLAKE3 seed derivation
//! - TOML configuration and goodness-of-fit statistics

pub mod config;
pub mod error;
pub mod population;
pub mod rng;
pub mod sampler;
pub mod select;
pub mod stats;

pub use config::{ConfigError, ItemSpec, SamplerConfig};
pub use error::SamplerError;
pub use population::Population;
pub use rng::{DefaultSource, FixedSequence, SeedTree, SeededSource, UniformSource};
pub use sampler::{SamplerBuilder, SamplerState, WeightedSampler};
pub use select::{choose_weighted_index, clamp_weight, select_cumulative};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: value types meant to cross threads are Send + Sync.
    ///
    /// The sampler itself is deliberately absent: it owns a boxed weight
    /// function and, by default, the thread-local generator.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<SamplerError>();
        require_sync::<SamplerError>();
        require_send::<ConfigError>();
        require_sync::<ConfigError>();
        require_send::<SamplerConfig>();
        require_sync::<SamplerConfig>();

        require_send::<SeedTree>();
        require_sync::<SeedTree>();
        require_send::<SeededSource>();
        require_sync::<SeededSource>();
        require_send::<FixedSequence>();
        require_sync::<FixedSequence>();
    }

    #[test]
    fn default_source_is_usable_from_root_exports() {
        let mut sampler = WeightedSampler::new(vec![1.0, 0.0], |w: &f64| *w).unwrap();
        assert_eq!(sampler.sample_index().unwrap(), 0);
    }
}
