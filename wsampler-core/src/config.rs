//! Serializable sampler configuration.
//!
//! A TOML file names the items to draw from, their weights, an optional
//! master seed, and the default number of draws:
//!
//! ```toml
//! seed = 42
//! draws = 12000
//!
//! [[items]]
//! name = "A"
//! weight = 200.0
//!
//! [[items]]
//! name = "B"
//! weight = 600.0
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::rng::{SeedTree, SeededSource};

/// Environment variable that overrides the configured master seed.
pub const SEED_ENV: &str = "WSAMPLER_SEED";

const DEFAULT_DRAWS: usize = 10_000;

fn default_draws() -> usize {
    DEFAULT_DRAWS
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid WSAMPLER_SEED value {0:?}: expected an unsigned integer")]
    InvalidSeed(String),
}

/// One named, weighted entry of the item table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemSpec {
    pub name: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SamplerConfig {
    /// Master seed. `None` means entropy-seeded, non-reproducible draws.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default = "default_draws")]
    pub draws: usize,

    #[serde(default)]
    pub items: Vec<ItemSpec>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            seed: None,
            draws: DEFAULT_DRAWS,
            items: Vec::new(),
        }
    }
}

impl SamplerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply `WSAMPLER_SEED` if it is set.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(raw) = std::env::var(SEED_ENV) {
            self.seed = Some(parse_seed(&raw)?);
        }
        Ok(())
    }

    pub fn seed_tree(&self) -> Option<SeedTree> {
        self.seed.map(SeedTree::new)
    }

    /// Random source for the stream named `label`.
    ///
    /// Seeded configs derive a reproducible sub-stream per label; unseeded
    /// configs fall back to OS entropy.
    pub fn source(&self, label: &str) -> SeededSource {
        match self.seed_tree() {
            Some(tree) => tree.source_for(label, 0),
            None => SeededSource::from_entropy(),
        }
    }
}

fn parse_seed(raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidSeed(raw.to_string()))
}
