//! Operator selections, resolved against the loaded dataset.

use crate::error::{ApiError, ApiResult};
use serde::Deserialize;
use ugv_analytics::MissionDataset;
use ugv_domain::{BatteryRange, ColorTheme, MissionFilter, SuccessFilter, TerrainLabel};

/// Raw selections from a control surface. Unset fields mean "everything".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    /// `None` selects every terrain present; `Some(vec![])` selects none.
    pub terrains: Option<Vec<String>>,
    pub battery_min: Option<f64>,
    pub battery_max: Option<f64>,
    pub success: Option<String>,
    pub theme: Option<String>,
}

impl FilterSelection {
    /// Build the mission filter and chart theme for this selection.
    pub fn resolve(
        &self,
        dataset: &MissionDataset,
        default_theme: ColorTheme,
    ) -> ApiResult<(MissionFilter, ColorTheme)> {
        let defaults = dataset.default_filter();

        let terrains = match &self.terrains {
            Some(labels) => labels
                .iter()
                .map(|label| TerrainLabel::from(label.trim()))
                .collect(),
            None => defaults.terrains,
        };

        let battery = BatteryRange::new(
            finite("battery_min", self.battery_min)?.unwrap_or(defaults.battery.min),
            finite("battery_max", self.battery_max)?.unwrap_or(defaults.battery.max),
        );

        let success = match &self.success {
            Some(raw) => raw.parse()?,
            None => SuccessFilter::All,
        };

        let theme = match &self.theme {
            Some(raw) => raw.parse()?,
            None => default_theme,
        };

        Ok((MissionFilter { terrains, battery, success }, theme))
    }
}

fn finite(name: &str, value: Option<f64>) -> ApiResult<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() => Err(ApiError::InvalidInput(format!(
            "{name} must be a finite number"
        ))),
        other => Ok(other),
    }
}

/// Query-string form of [`FilterSelection`]; `terrains` is comma separated.
///
/// Numbers stay raw so a malformed value becomes an [`ApiError`] rather than
/// an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardParams {
    pub terrains: Option<String>,
    pub battery_min: Option<String>,
    pub battery_max: Option<String>,
    pub success: Option<String>,
    pub theme: Option<String>,
}

impl TryFrom<DashboardParams> for FilterSelection {
    type Error = ApiError;

    fn try_from(params: DashboardParams) -> ApiResult<Self> {
        Ok(Self {
            terrains: params.terrains.map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|label| !label.is_empty())
                    .map(String::from)
                    .collect()
            }),
            battery_min: number("battery_min", params.battery_min.as_deref())?,
            battery_max: number("battery_max", params.battery_max.as_deref())?,
            success: params.success,
            theme: params.theme,
        })
    }
}

/// Parse an optional query number; an empty value counts as unset.
fn number(name: &str, raw: Option<&str>) -> ApiResult<Option<f64>> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| ApiError::InvalidInput(format!("{name} must be a number, got '{v}'"))),
        None => Ok(None),
    }
}
