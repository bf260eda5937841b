//! Command implementations behind the `wsampler` binary.
//!
//! Each command loads a [`SamplerConfig`], builds a sampler over its item
//! table (weight = the item's configured weight), and produces a serializable
//! report. Rendering and argument parsing live in `main.rs`.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use wsampler_core::stats::{chi_squared, degrees_of_freedom};
use wsampler_core::{ItemSpec, SamplerConfig, SeededSource, WeightedSampler};

/// Environment variable holding the log filter (e.g. `debug`, `wsampler_core=trace`).
pub const LOG_ENV: &str = "WSAMPLER_LOG";

pub type ItemSampler = WeightedSampler<Vec<ItemSpec>, SeededSource>;

/// Install the stderr subscriber. `verbose` raises the default level to debug.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load a config file, apply environment overrides, then an explicit seed.
pub fn load_config(path: &Path, seed: Option<u64>) -> Result<SamplerConfig> {
    let mut config = SamplerConfig::load(path)
        .with_context(|| format!("loading config {}", path.display()))?;
    config.apply_env()?;
    if seed.is_some() {
        config.seed = seed;
    }
    if config.items.is_empty() {
        bail!("config {} defines no items", path.display());
    }
    debug!(items = config.items.len(), seed = ?config.seed, "loaded config");
    Ok(config)
}

/// Sampler over the config's item table, drawing from the `label` stream.
pub fn build_sampler(config: &SamplerConfig, label: &str) -> Result<ItemSampler> {
    let sampler = WeightedSampler::with_rng(
        config.items.clone(),
        |item: &ItemSpec| item.weight,
        config.source(label),
    )
    .context("building sampler from item table")?;
    Ok(sampler)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ItemReport {
    pub name: String,
    pub weight: f64,
    pub count: u64,
    pub observed: f64,
    pub expected: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DrawReport {
    pub draws: usize,
    pub seed: Option<u64>,
    pub weight_sum: f64,
    pub chi_squared: f64,
    pub degrees_of_freedom: usize,
    pub items: Vec<ItemReport>,
}

/// Draw `draws` samples and tabulate observed vs expected frequencies.
pub fn draw_report(config: &SamplerConfig, draws: usize) -> Result<DrawReport> {
    let mut sampler = build_sampler(config, "draw")?;
    let counts = sampler.frequencies(draws)?;
    let stat = chi_squared(&counts, sampler.weights());
    info!(draws, chi_squared = stat, "draw complete");

    let items = config
        .items
        .iter()
        .zip(&counts)
        .enumerate()
        .map(|(index, (spec, &count))| ItemReport {
            name: spec.name.clone(),
            weight: sampler.weights()[index],
            count,
            observed: if draws == 0 {
                0.0
            } else {
                count as f64 / draws as f64
            },
            expected: sampler.probability(index).unwrap_or(0.0),
        })
        .collect();

    Ok(DrawReport {
        draws,
        seed: config.seed,
        weight_sum: sampler.weight_sum(),
        chi_squared: stat,
        degrees_of_freedom: degrees_of_freedom(sampler.weights()),
        items,
    })
}

/// Names of `count` sampled items, in draw order.
pub fn pick(config: &SamplerConfig, count: usize) -> Result<Vec<String>> {
    let mut sampler = build_sampler(config, "pick")?;
    let mut names = Vec::with_capacity(count);
    for _ in 0..count {
        names.push(sampler.sample_with(|item| item.name.clone())?);
    }
    Ok(names)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeightEntry {
    pub name: String,
    pub weight: f64,
    pub probability: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeightsReport {
    pub weight_sum: f64,
    pub items: Vec<WeightEntry>,
}

/// The refreshed snapshot: clamped weights and their selection probabilities.
pub fn weights_report(config: &SamplerConfig) -> Result<WeightsReport> {
    let sampler = build_sampler(config, "weights")?;
    let items = config
        .items
        .iter()
        .enumerate()
        .map(|(index, spec)| WeightEntry {
            name: spec.name.clone(),
            weight: sampler.weights()[index],
            probability: sampler.probability(index).unwrap_or(0.0),
        })
        .collect();
    Ok(WeightsReport {
        weight_sum: sampler.weight_sum(),
        items,
    })
}

/// Plain-text table: one row per item, then a summary line.
impl fmt::Display for DrawReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = name_width(self.items.iter().map(|i| i.name.as_str()));
        writeln!(
            f,
            "{:<width$}  {:>12}  {:>10}  {:>9}  {:>9}",
            "item", "weight", "count", "observed", "expected"
        )?;
        for item in &self.items {
            writeln!(
                f,
                "{:<width$}  {:>12.3}  {:>10}  {:>9.4}  {:>9.4}",
                item.name, item.weight, item.count, item.observed, item.expected
            )?;
        }
        writeln!(
            f,
            "draws: {}  weight sum: {:.3}  chi-squared: {:.3} (df {})",
            self.draws, self.weight_sum, self.chi_squared, self.degrees_of_freedom
        )
    }
}

impl fmt::Display for WeightsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = name_width(self.items.iter().map(|i| i.name.as_str()));
        writeln!(f, "{:<width$}  {:>12}  {:>11}", "item", "weight", "probability")?;
        for item in &self.items {
            writeln!(
                f,
                "{:<width$}  {:>12.3}  {:>11.4}",
                item.name, item.weight, item.probability
            )?;
        }
        writeln!(f, "weight sum: {:.3}", self.weight_sum)
    }
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(str::len).max().unwrap_or(0).max("item".len())
}
