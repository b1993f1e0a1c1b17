//! UGV Mission Simulator CLI
//!
//! Writes a synthetic mission dataset CSV for the dashboard.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ugv_simulator::{MissionSimulator, write_dataset};

#[derive(Parser, Debug)]
#[command(name = "ugv-simulator")]
#[command(about = "Generate a synthetic UGV mission dataset")]
struct Args {
    /// Number of missions
    #[arg(short, long, default_value = "220")]
    rows: usize,

    /// RNG seed for a reproducible dataset
    #[arg(short, long)]
    seed: Option<u64>,

    /// How strongly conditions drive outcomes
    #[arg(long, default_value = "1.0", value_parser = parse_gain)]
    difficulty: f64,

    /// Output CSV path
    #[arg(short, long, default_value = "ugv_mission_dataset_220rows.csv")]
    output: PathBuf,
}

fn parse_gain(raw: &str) -> std::result::Result<f64, String> {
    let gain: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    if gain.is_finite() {
        Ok(gain)
    } else {
        Err("difficulty must be a finite number".to_string())
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("ugv_simulator=info".parse()?))
        .init();

    let args = Args::parse();

    let simulator = match args.seed {
        Some(seed) => MissionSimulator::with_seed(seed),
        None => MissionSimulator::new(),
    };
    let mut simulator = simulator.with_difficulty_gain(args.difficulty);

    info!(rows = args.rows, seed = ?args.seed, "Generating mission dataset");
    let written = write_dataset(&mut simulator, args.rows, &args.output)?;
    info!(rows = written, path = %args.output.display(), "Dataset written");

    Ok(())
}
