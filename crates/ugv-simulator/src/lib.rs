//! # UGV Simulator
//!
//! Synthetic mission dataset generator for the UGV mission dashboard.
//!
//! ## Features
//!
//! - Seedable, reproducible mission generation
//! - Outcomes driven by battery, comms, sensor health, obstacles and terrain
//! - CSV export with the dataset column layout

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod mission;

pub use mission::MissionSimulator;

use std::path::Path;
use ugv_analytics::AnalyticsEngine;

/// Generate `rows` missions and write them as CSV. Returns the rows written.
pub fn write_dataset<P: AsRef<Path>>(
    simulator: &mut MissionSimulator,
    rows: usize,
    path: P,
) -> ugv_analytics::error::Result<usize> {
    let missions = simulator.simulate_batch(rows);
    let engine = AnalyticsEngine::new_in_memory()?;
    let count = engine.ingest_missions(&missions)?;
    engine.export_to_csv(path)?;
    Ok(count)
}
