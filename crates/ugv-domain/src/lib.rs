//! # UGV Mission Dashboard - Domain Model
//!
//! Core records, value objects and filter selections for unmanned ground
//! vehicle mission logs. These types are shared by the analytics engine,
//! the dashboard service and the dataset simulator.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// VALUE OBJECTS
// =============================================================================

/// Human-readable terrain category derived from a numeric `TerrainType` code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TerrainLabel(String);

impl TerrainLabel {
    /// Map a terrain code to its label. Codes 0-3 have named labels, any
    /// other code is stringified as-is.
    #[must_use]
    pub fn from_terrain_type(code: i64) -> Self {
        match code {
            0 => Self("Type 0".to_string()),
            1 => Self("Type 1".to_string()),
            2 => Self("Type 2".to_string()),
            3 => Self("Type 3".to_string()),
            other => Self(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TerrainLabel {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

impl From<String> for TerrainLabel {
    fn from(label: String) -> Self {
        Self(label)
    }
}

impl fmt::Display for TerrainLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inclusive battery level range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryRange {
    pub min: f64,
    pub max: f64,
}

impl BatteryRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A range with `min > max` contains nothing.
    #[must_use]
    pub fn contains(&self, level: f64) -> bool {
        level >= self.min && level <= self.max
    }
}

// =============================================================================
// ENTITY TYPES
// =============================================================================

/// One row of the mission dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MissionRecord {
    pub terrain_type: i64,
    pub battery_level: f64,
    pub payload_weight: f64,
    pub comm_quality: f64,
    pub sensor_health: f64,
    pub obstacle_density: f64,
    pub speed: f64,
    pub mission_time: f64,
    /// 1 for a successful mission, 0 for a failure
    pub mission_success: u8,
}

impl MissionRecord {
    /// Dataset column names, in file order.
    pub const COLUMNS: [&'static str; 9] = [
        "TerrainType",
        "BatteryLevel",
        "PayloadWeight",
        "CommQuality",
        "SensorHealth",
        "ObstacleDensity",
        "Speed",
        "MissionTime",
        "MissionSuccess",
    ];

    #[must_use]
    pub fn terrain_label(&self) -> TerrainLabel {
        TerrainLabel::from_terrain_type(self.terrain_type)
    }

    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.mission_success == 1
    }

    /// Convert a raw `MissionSuccess` column value, rejecting anything but 0 or 1.
    pub fn parse_success(raw: i64) -> Result<u8, DomainError> {
        match raw {
            0 => Ok(0),
            1 => Ok(1),
            other => Err(DomainError::InvalidMissionSuccess(other)),
        }
    }
}

// =============================================================================
// ENUMS
// =============================================================================

/// Mission outcome selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessFilter {
    #[default]
    All,
    SuccessOnly,
    FailureOnly,
}

impl SuccessFilter {
    pub const ALL: [Self; 3] = [Self::All, Self::SuccessOnly, Self::FailureOnly];

    /// Operator-facing label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::SuccessOnly => "Success only",
            Self::FailureOnly => "Failure only",
        }
    }

    #[must_use]
    pub fn matches(&self, record: &MissionRecord) -> bool {
        match self {
            Self::All => true,
            Self::SuccessOnly => record.mission_success == 1,
            Self::FailureOnly => record.mission_success == 0,
        }
    }
}

impl FromStr for SuccessFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "all" => Ok(Self::All),
            "success only" => Ok(Self::SuccessOnly),
            "failure only" => Ok(Self::FailureOnly),
            _ => Err(DomainError::InvalidSuccessFilter(s.to_string())),
        }
    }
}

impl fmt::Display for SuccessFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chart color scheme. Cosmetic only, never part of filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    #[default]
    Blues,
    Viridis,
    Magma,
    Plasma,
    Redblue,
    Greens,
}

impl ColorTheme {
    pub const ALL: [Self; 6] = [
        Self::Blues,
        Self::Viridis,
        Self::Magma,
        Self::Plasma,
        Self::Redblue,
        Self::Greens,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blues => "blues",
            Self::Viridis => "viridis",
            Self::Magma => "magma",
            Self::Plasma => "plasma",
            Self::Redblue => "redblue",
            Self::Greens => "greens",
        }
    }
}

impl FromStr for ColorTheme {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str() == wanted)
            .ok_or_else(|| DomainError::InvalidColorTheme(s.to_string()))
    }
}

impl fmt::Display for ColorTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// QUERY/FILTER TYPES
// =============================================================================

/// Operator filter selections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionFilter {
    pub terrains: BTreeSet<TerrainLabel>,
    pub battery: BatteryRange,
    pub success: SuccessFilter,
}

impl MissionFilter {
    pub fn new(
        terrains: impl IntoIterator<Item = TerrainLabel>,
        battery: BatteryRange,
        success: SuccessFilter,
    ) -> Self {
        Self {
            terrains: terrains.into_iter().collect(),
            battery,
            success,
        }
    }

    /// Inclusion predicate: terrain selected, battery in range, outcome matches.
    #[must_use]
    pub fn matches(&self, record: &MissionRecord) -> bool {
        self.terrains.contains(&record.terrain_label())
            && self.battery.contains(record.battery_level)
            && self.success.matches(record)
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Domain-level errors
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid success filter: '{0}' (expected All, Success only or Failure only)")]
    InvalidSuccessFilter(String),

    #[error("Invalid color theme: '{0}'")]
    InvalidColorTheme(String),

    #[error("Invalid MissionSuccess value {0} (expected 0 or 1)")]
    InvalidMissionSuccess(i64),
}
