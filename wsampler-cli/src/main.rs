//! wsampler CLI — draw, pick, and inspect weighted samples.
//!
//! Commands:
//! - `draw` — sample N times and report observed vs expected frequencies
//! - `pick` — print sampled item names, one per line
//! - `weights` — print the clamped weight snapshot and probabilities

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wsampler_cli::{draw_report, init_logging, load_config, pick, weights_report};

#[derive(Parser)]
#[command(
    name = "wsampler",
    about = "wsampler CLI — weighted random selection from a TOML item table"
)]
struct Cli {
    /// Log at debug level (overridden by WSAMPLER_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample N draws and report per-item counts and a chi-squared statistic.
    Draw {
        /// Path to a TOML item table.
        #[arg(long)]
        config: PathBuf,

        /// Number of draws. Defaults to the config's `draws`.
        #[arg(long)]
        draws: Option<usize>,

        /// Master seed (overrides config and WSAMPLER_SEED).
        #[arg(long)]
        seed: Option<u64>,

        /// Emit JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print sampled item names, one per line.
    Pick {
        /// Path to a TOML item table.
        #[arg(long)]
        config: PathBuf,

        /// Number of items to pick.
        #[arg(long, default_value_t = 1)]
        count: usize,

        /// Master seed (overrides config and WSAMPLER_SEED).
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the clamped weight snapshot.
    Weights {
        /// Path to a TOML item table.
        #[arg(long)]
        config: PathBuf,

        /// Emit JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Draw {
            config,
            draws,
            seed,
            json,
        } => {
            let config = load_config(&config, seed)?;
            let report = draw_report(&config, draws.unwrap_or(config.draws))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
        }
        Commands::Pick {
            config,
            count,
            seed,
        } => {
            let config = load_config(&config, seed)?;
            for name in pick(&config, count)? {
                println!("{name}");
            }
        }
        Commands::Weights { config, json } => {
            let config = load_config(&config, None)?;
            let report = weights_report(&config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
        }
    }

    Ok(())
}
