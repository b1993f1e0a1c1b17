//! # UGV Analytics
//!
//! Mission data filter and aggregator for UGV mission logs.
//! Uses DuckDB to ingest and export the CSV dataset; every aggregation runs
//! over an in-memory, read-only [`MissionDataset`].
//!
//! ## Features
//!
//! - Terrain / battery / outcome filtering
//! - Summary metrics against the full dataset
//! - Obstacle profile around the median density
//! - Terrain x obstacle-density success heatmap
//! - Top-terrain success ranking

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod dataset;
pub mod engine;
pub mod error;
pub mod queries;
pub mod reports;

pub use dataset::{FilteredMissions, MissionDataset};
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use reports::{DashboardReport, NO_DATA_NOTICE};
