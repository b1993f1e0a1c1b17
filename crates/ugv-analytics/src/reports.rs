//! Dashboard report generation.

use crate::dataset::MissionDataset;
use crate::error::{AnalyticsError, Result};
use crate::queries::{MissionSummary, ObstacleProfile, ScatterPoint, SuccessHeatmap, TerrainRanking};
use serde::{Deserialize, Serialize};
use ugv_domain::{ColorTheme, MissionFilter};

/// Notice shown in place of a panel when the filtered subset is empty.
pub const NO_DATA_NOTICE: &str = "No missions match the selected conditions.";

/// Every dashboard panel for one filter selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub generated_at: String,
    pub filter: MissionFilter,
    pub color_theme: ColorTheme,
    pub summary: MissionSummary,
    pub obstacle_profile: Option<ObstacleProfile>,
    pub heatmap: Option<SuccessHeatmap>,
    pub scatter: Vec<ScatterPoint>,
    pub top_terrains: Vec<TerrainRanking>,
}

impl DashboardReport {
    pub fn has_data(&self) -> bool {
        self.summary.missions > 0
    }
}

impl MissionDataset {
    /// Recompute the filtered subset and every aggregation.
    pub fn generate_report(&self, filter: &MissionFilter, color_theme: ColorTheme) -> DashboardReport {
        let filtered = self.filter(filter);

        DashboardReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            filter: filter.clone(),
            color_theme,
            summary: filtered.summary(self),
            obstacle_profile: filtered.obstacle_profile(),
            heatmap: filtered.success_heatmap(),
            scatter: filtered.scatter_points(),
            top_terrains: filtered.top_terrains(),
        }
    }

    /// Generate report as JSON string.
    pub fn generate_report_json(&self, filter: &MissionFilter, color_theme: ColorTheme) -> Result<String> {
        let report = self.generate_report(filter, color_theme);
        serde_json::to_string_pretty(&report).map_err(|e| AnalyticsError::Conversion(e.to_string()))
    }

    /// Generate Markdown report.
    pub fn generate_report_markdown(&self, filter: &MissionFilter, color_theme: ColorTheme) -> String {
        render_markdown(&self.generate_report(filter, color_theme))
    }
}

/// Render a report as a Markdown document, one section per panel.
pub fn render_markdown(report: &DashboardReport) -> String {
    let mut md = String::new();
    md.push_str("# UGV Mission Dashboard\n\n");
    md.push_str(&format!("**Generated:** {}\n\n", report.generated_at));

    let terrains: Vec<&str> = report.filter.terrains.iter().map(|t| t.as_str()).collect();
    md.push_str("## Filters\n\n");
    md.push_str("| Filter | Value |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Terrain Types | {} |\n", if terrains.is_empty() { "(none)".to_string() } else { terrains.join(", ") }));
    md.push_str(&format!(
        "| Battery Level | {} - {} |\n",
        report.filter.battery.min, report.filter.battery.max
    ));
    md.push_str(&format!("| Mission Success | {} |\n", report.filter.success));
    md.push_str(&format!("| Color Theme | {} |\n\n", report.color_theme));

    let summary = &report.summary;
    md.push_str("## Mission Overview\n\n");
    md.push_str("| Metric | Value | vs All |\n");
    md.push_str("|--------|-------|--------|\n");
    md.push_str(&format!(
        "| Missions (filtered) | {} | {:+} |\n",
        summary.missions, summary.missions_delta
    ));
    md.push_str(&format!(
        "| Success Rate | {:.1} % | {:+.1} % |\n",
        summary.success_rate.value * 100.0,
        summary.success_rate.delta * 100.0
    ));
    md.push_str(&format!(
        "| Avg Mission Time | {:.1} min | {:+.1} |\n",
        summary.avg_mission_time.value, summary.avg_mission_time.delta
    ));
    md.push_str(&format!(
        "| Avg Speed | {:.2} | {:+.2} |\n\n",
        summary.avg_speed.value, summary.avg_speed.delta
    ));

    md.push_str("## Obstacle Profile\n\n");
    match &report.obstacle_profile {
        Some(profile) => {
            md.push_str(&format!("Median obstacle density: {:.3}\n\n", profile.threshold));
            md.push_str(&format!(
                "- High obstacle missions: {:.1} % ({})\n",
                profile.high_fraction * 100.0,
                profile.high_missions
            ));
            md.push_str(&format!(
                "- Low/medium obstacle missions: {:.1} % ({})\n\n",
                profile.low_fraction * 100.0,
                profile.low_missions
            ));
        }
        None => md.push_str(&format!("{NO_DATA_NOTICE}\n\n")),
    }

    md.push_str("## Success Rate Heatmap\n\n");
    match &report.heatmap {
        Some(heatmap) => {
            md.push_str("| Terrain | Obstacle Range | Missions | Success Rate |\n");
            md.push_str("|---------|----------------|----------|--------------|\n");
            for cell in &heatmap.cells {
                md.push_str(&format!(
                    "| {} | {} | {} | {:.2} |\n",
                    cell.terrain_label, cell.obstacle_bin, cell.missions, cell.success_rate
                ));
            }
            md.push('\n');
        }
        None => md.push_str(&format!("{NO_DATA_NOTICE}\n\n")),
    }

    md.push_str("## Speed vs Battery Level\n\n");
    if report.scatter.is_empty() {
        md.push_str(&format!("{NO_DATA_NOTICE}\n\n"));
    } else {
        md.push_str(&format!("{} missions plotted.\n\n", report.scatter.len()));
    }

    md.push_str("## Top Terrain Types\n\n");
    if report.top_terrains.is_empty() {
        md.push_str(&format!("{NO_DATA_NOTICE}\n\n"));
    } else {
        md.push_str("| Rank | Terrain | Missions | Success Rate |\n");
        md.push_str("|------|---------|----------|--------------|\n");
        for (i, row) in report.top_terrains.iter().enumerate() {
            md.push_str(&format!(
                "| {} | {} | {} | {:.2} |\n",
                i + 1,
                row.terrain_label,
                row.missions,
                row.success_rate
            ));
        }
        md.push('\n');
    }

    md
}
