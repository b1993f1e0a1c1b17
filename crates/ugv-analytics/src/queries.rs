//! Aggregations over a filtered mission subset.
//!
//! Every aggregation is a pure function of the filtered view (and, for the
//! summary, the full dataset). An empty subset yields a "no data" result
//! (`None`, empty rows or zeroed metrics), never NaN.

use crate::dataset::{FilteredMissions, MissionDataset};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use ugv_domain::{MissionRecord, TerrainLabel};

/// Number of equal-width obstacle density bins in the heatmap.
pub const OBSTACLE_BIN_COUNT: usize = 6;

/// Maximum number of rows in the top-terrain ranking.
pub const TOP_TERRAIN_LIMIT: usize = 5;

/// A filtered metric next to its full-dataset baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    pub value: f64,
    pub baseline: f64,
    /// `value - baseline`
    pub delta: f64,
}

impl MetricDelta {
    fn new(value: f64, baseline: f64) -> Self {
        Self {
            value,
            baseline,
            delta: value - baseline,
        }
    }
}

/// Mission overview metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionSummary {
    pub missions: usize,
    pub missions_all: usize,
    pub missions_delta: i64,
    pub success_rate: MetricDelta,
    pub avg_mission_time: MetricDelta,
    pub avg_speed: MetricDelta,
}

/// High versus low/medium obstacle density split around the median.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleProfile {
    /// Median obstacle density of the filtered subset
    pub threshold: f64,
    pub high_missions: usize,
    pub low_missions: usize,
    pub high_fraction: f64,
    pub low_fraction: f64,
}

/// Equal-width partition of an observed obstacle density range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleBins {
    edges: [f64; OBSTACLE_BIN_COUNT + 1],
}

impl ObstacleBins {
    /// Build bins spanning the observed range; `None` when there are no values.
    pub fn from_densities(densities: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut densities = densities.into_iter();
        let first = densities.next()?;
        let (mut min, mut max) = densities.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));

        // A zero-width range is widened so the six bins stay distinct.
        if (max - min).abs() < f64::EPSILON {
            let adjust = if min == 0.0 { 0.001 } else { min.abs() * 0.001 };
            min -= adjust;
            max += adjust;
        }

        let width = (max - min) / OBSTACLE_BIN_COUNT as f64;
        let mut edges = [0.0; OBSTACLE_BIN_COUNT + 1];
        for (i, edge) in edges.iter_mut().enumerate() {
            *edge = min + width * i as f64;
        }
        edges[OBSTACLE_BIN_COUNT] = max;

        Some(Self { edges })
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Bin index of a density. Intervals are right-closed, the first also
    /// includes its lower edge.
    pub fn index_of(&self, density: f64) -> usize {
        (1..=OBSTACLE_BIN_COUNT)
            .find(|&i| density <= self.edges[i])
            .map_or(OBSTACLE_BIN_COUNT - 1, |i| i - 1)
    }

    pub fn bounds(&self, index: usize) -> (f64, f64) {
        (self.edges[index], self.edges[index + 1])
    }

    pub fn label(&self, index: usize) -> String {
        let (lo, hi) = self.bounds(index);
        if index == 0 {
            format!("[{lo:.3}, {hi:.3}]")
        } else {
            format!("({lo:.3}, {hi:.3}]")
        }
    }
}

/// One non-empty (terrain, obstacle bin) group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub terrain_label: TerrainLabel,
    pub obstacle_bin: String,
    pub bin_index: usize,
    pub bin_start: f64,
    pub bin_end: f64,
    pub missions: usize,
    pub success_rate: f64,
}

/// Sparse terrain x obstacle-bin success table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessHeatmap {
    pub bins: ObstacleBins,
    pub cells: Vec<HeatmapCell>,
}

/// Success rate for one terrain label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainRanking {
    pub terrain_label: TerrainLabel,
    pub success_rate: f64,
    pub missions: usize,
}

/// A filtered mission ready for a speed/battery scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScatterPoint {
    pub terrain_label: TerrainLabel,
    #[serde(flatten)]
    pub mission: MissionRecord,
}

/// Count of successes and missions in a group.
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    successes: usize,
    missions: usize,
}

impl Tally {
    fn add(&mut self, record: &MissionRecord) {
        self.missions += 1;
        if record.succeeded() {
            self.successes += 1;
        }
    }

    fn rate(self) -> f64 {
        if self.missions == 0 {
            0.0
        } else {
            self.successes as f64 / self.missions as f64
        }
    }
}

fn success_rate<'r>(records: impl IntoIterator<Item = &'r MissionRecord>) -> f64 {
    let mut tally = Tally::default();
    for record in records {
        tally.add(record);
    }
    tally.rate()
}

fn mean_or_zero(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.mean()
    }
}

/// Median with the two middle values averaged for even counts.
fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

impl FilteredMissions<'_> {
    /// Overview metrics against the full dataset.
    pub fn summary(&self, all: &MissionDataset) -> MissionSummary {
        let time: Vec<f64> = self.iter().map(|r| r.mission_time).collect();
        let time_all: Vec<f64> = all.records().iter().map(|r| r.mission_time).collect();
        let speed: Vec<f64> = self.iter().map(|r| r.speed).collect();
        let speed_all: Vec<f64> = all.records().iter().map(|r| r.speed).collect();

        MissionSummary {
            missions: self.len(),
            missions_all: all.len(),
            missions_delta: self.len() as i64 - all.len() as i64,
            success_rate: MetricDelta::new(success_rate(self.iter()), success_rate(all.records())),
            avg_mission_time: MetricDelta::new(mean_or_zero(&time), mean_or_zero(&time_all)),
            avg_speed: MetricDelta::new(mean_or_zero(&speed), mean_or_zero(&speed_all)),
        }
    }

    /// Fraction of missions above the median obstacle density.
    pub fn obstacle_profile(&self) -> Option<ObstacleProfile> {
        let mut densities: Vec<f64> = self.iter().map(|r| r.obstacle_density).collect();
        let threshold = median(&mut densities)?;

        let high_missions = self.iter().filter(|r| r.obstacle_density > threshold).count();
        let low_missions = self.len() - high_missions;
        let high_fraction = high_missions as f64 / self.len() as f64;

        Some(ObstacleProfile {
            threshold,
            high_missions,
            low_missions,
            high_fraction,
            low_fraction: 1.0 - high_fraction,
        })
    }

    /// Mean success per (terrain, obstacle bin) group, ordered by terrain then bin.
    pub fn success_heatmap(&self) -> Option<SuccessHeatmap> {
        let bins = ObstacleBins::from_densities(self.iter().map(|r| r.obstacle_density))?;

        let mut groups: BTreeMap<(TerrainLabel, usize), Tally> = BTreeMap::new();
        for record in self.iter() {
            let key = (record.terrain_label(), bins.index_of(record.obstacle_density));
            groups.entry(key).or_default().add(record);
        }

        let cells = groups
            .into_iter()
            .map(|((terrain_label, bin_index), tally)| {
                let (bin_start, bin_end) = bins.bounds(bin_index);
                HeatmapCell {
                    terrain_label,
                    obstacle_bin: bins.label(bin_index),
                    bin_index,
                    bin_start,
                    bin_end,
                    missions: tally.missions,
                    success_rate: tally.rate(),
                }
            })
            .collect();

        Some(SuccessHeatmap { bins, cells })
    }

    /// Terrain labels by success rate, then mission count, at most five.
    pub fn top_terrains(&self) -> Vec<TerrainRanking> {
        let mut groups: BTreeMap<TerrainLabel, Tally> = BTreeMap::new();
        for record in self.iter() {
            groups.entry(record.terrain_label()).or_default().add(record);
        }

        let mut ranking: Vec<TerrainRanking> = groups
            .into_iter()
            .map(|(terrain_label, tally)| TerrainRanking {
                terrain_label,
                success_rate: tally.rate(),
                missions: tally.missions,
            })
            .collect();

        ranking.sort_by(|a, b| {
            b.success_rate
                .total_cmp(&a.success_rate)
                .then(b.missions.cmp(&a.missions))
        });
        ranking.truncate(TOP_TERRAIN_LIMIT);
        ranking
    }

    pub fn scatter_points(&self) -> Vec<ScatterPoint> {
        self.iter()
            .map(|mission| ScatterPoint {
                terrain_label: mission.terrain_label(),
                mission: mission.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::{mission, sample_dataset};
    use ugv_domain::{BatteryRange, MissionFilter, SuccessFilter};

    fn with_density(mut record: MissionRecord, density: f64) -> MissionRecord {
        record.obstacle_density = density;
        record
    }

    fn none_selected() -> MissionFilter {
        MissionFilter::new(
            Vec::<TerrainLabel>::new(),
            BatteryRange::new(0.0, 100.0),
            SuccessFilter::All,
        )
    }

    #[test]
    fn test_summary_success_rates() {
        let dataset = sample_dataset();
        let filter = dataset.default_filter();

        let summary = dataset.filter(&filter).summary(&dataset);
        assert_eq!(summary.missions, 3);
        assert!((summary.success_rate.value - 2.0 / 3.0).abs() < 1e-12);
        assert!(summary.success_rate.delta.abs() < 1e-12);

        let success_only = MissionFilter {
            success: SuccessFilter::SuccessOnly,
            ..filter
        };
        let summary = dataset.filter(&success_only).summary(&dataset);
        assert_eq!(summary.missions, 2);
        assert_eq!(summary.missions_delta, -1);
        assert!((summary.success_rate.value - 1.0).abs() < f64::EPSILON);
        assert!((summary.success_rate.delta - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_summary_means() {
        let mut fast = mission(0, 50.0, 1);
        fast.speed = 8.0;
        fast.mission_time = 20.0;
        let mut slow = mission(1, 60.0, 0);
        slow.speed = 2.0;
        slow.mission_time = 60.0;
        let dataset = MissionDataset::new(vec![fast, slow]);

        let filter = MissionFilter::new(
            [TerrainLabel::from("Type 0")],
            BatteryRange::new(0.0, 100.0),
            SuccessFilter::All,
        );
        let summary = dataset.filter(&filter).summary(&dataset);

        assert!((summary.avg_speed.value - 8.0).abs() < 1e-9);
        assert!((summary.avg_speed.baseline - 5.0).abs() < 1e-9);
        assert!((summary.avg_speed.delta - 3.0).abs() < 1e-9);
        assert!((summary.avg_mission_time.value - 20.0).abs() < 1e-9);
        assert!((summary.avg_mission_time.delta + 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_subset_is_no_data() {
        let dataset = sample_dataset();
        let filtered = dataset.filter(&none_selected());

        let summary = filtered.summary(&dataset);
        assert_eq!(summary.missions, 0);
        assert_eq!(summary.missions_all, 3);
        assert!(summary.success_rate.value.abs() < f64::EPSILON);
        assert!(summary.avg_mission_time.value.abs() < f64::EPSILON);
        assert!(summary.avg_speed.value.abs() < f64::EPSILON);

        assert!(filtered.obstacle_profile().is_none());
        assert!(filtered.success_heatmap().is_none());
        assert!(filtered.top_terrains().is_empty());
        assert!(filtered.scatter_points().is_empty());
    }

    #[test]
    fn test_summary_over_empty_dataset() {
        let dataset = MissionDataset::default();
        let summary = dataset.filter(&none_selected()).summary(&dataset);

        assert_eq!(summary.missions, 0);
        assert_eq!(summary.missions_all, 0);
        assert_eq!(summary.missions_delta, 0);
        for metric in [summary.success_rate, summary.avg_mission_time, summary.avg_speed] {
            assert!(!metric.value.is_nan() && !metric.baseline.is_nan());
            assert!(metric.value.abs() < f64::EPSILON);
            assert!(metric.baseline.abs() < f64::EPSILON);
            assert!(metric.delta.abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_obstacle_profile_splits_at_median() {
        let dataset = MissionDataset::new(vec![
            with_density(mission(0, 50.0, 1), 0.1),
            with_density(mission(0, 50.0, 1), 0.2),
            with_density(mission(1, 50.0, 0), 0.3),
            with_density(mission(2, 50.0, 0), 0.9),
        ]);
        let profile = dataset
            .filter(&dataset.default_filter())
            .obstacle_profile()
            .unwrap();

        assert!((profile.threshold - 0.25).abs() < 1e-12);
        assert_eq!(profile.high_missions, 2);
        assert_eq!(profile.low_missions, 2);
        assert!((profile.high_fraction + profile.low_fraction - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_obstacle_profile_median_value_counts_as_low() {
        let dataset = MissionDataset::new(vec![
            with_density(mission(0, 50.0, 1), 0.2),
            with_density(mission(0, 50.0, 1), 0.5),
            with_density(mission(0, 50.0, 1), 0.7),
        ]);
        let profile = dataset
            .filter(&dataset.default_filter())
            .obstacle_profile()
            .unwrap();

        assert!((profile.threshold - 0.5).abs() < f64::EPSILON);
        assert_eq!(profile.high_missions, 1);
        assert!((profile.high_fraction - 1.0 / 3.0).abs() < 1e-12);
        assert!((profile.high_fraction + profile.low_fraction - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bins_span_observed_range() {
        let bins = ObstacleBins::from_densities([0.0, 0.6, 0.3]).unwrap();

        assert!((bins.edges()[0] - 0.0).abs() < f64::EPSILON);
        assert!((bins.edges()[6] - 0.6).abs() < f64::EPSILON);
        assert_eq!(bins.index_of(0.0), 0);
        assert_eq!(bins.index_of(0.05), 0);
        assert_eq!(bins.index_of(0.15), 1);
        assert_eq!(bins.index_of(0.6), 5);
        assert_eq!(bins.label(0), "[0.000, 0.100]");
        assert_eq!(bins.label(5), "(0.500, 0.600]");
    }

    #[test]
    fn test_bins_widen_constant_range() {
        let bins = ObstacleBins::from_densities([0.5, 0.5]).unwrap();
        let (lo, hi) = (bins.edges()[0], bins.edges()[6]);

        assert!(lo < 0.5 && hi > 0.5);
        assert!((hi - lo - 0.001).abs() < 1e-12);
        let index = bins.index_of(0.5);
        assert!(index < OBSTACLE_BIN_COUNT);
        assert!(ObstacleBins::from_densities(std::iter::empty()).is_none());
    }

    #[test]
    fn test_heatmap_groups_are_sparse_exact_means() {
        let dataset = MissionDataset::new(vec![
            with_density(mission(0, 50.0, 1), 0.0),
            with_density(mission(0, 50.0, 0), 0.05),
            with_density(mission(0, 50.0, 1), 0.08),
            with_density(mission(1, 50.0, 0), 0.6),
        ]);
        let heatmap = dataset
            .filter(&dataset.default_filter())
            .success_heatmap()
            .unwrap();

        assert_eq!(heatmap.cells.len(), 2);

        let first = &heatmap.cells[0];
        assert_eq!(first.terrain_label.as_str(), "Type 0");
        assert_eq!(first.bin_index, 0);
        assert_eq!(first.missions, 3);
        assert!((first.success_rate - 2.0 / 3.0).abs() < 1e-12);

        let second = &heatmap.cells[1];
        assert_eq!(second.terrain_label.as_str(), "Type 1");
        assert_eq!(second.bin_index, 5);
        assert!(second.success_rate.abs() < f64::EPSILON);

        for cell in &heatmap.cells {
            assert!((0.0..=1.0).contains(&cell.success_rate));
        }
    }

    #[test]
    fn test_top_terrains_sorted_with_tiebreak() {
        let mut records = Vec::new();
        // Type 0: 2/2, Type 1: 4/4, Type 2: 1/2, Type 3: 0/1, 7: 1/2, 9: 1/1
        records.extend([mission(0, 50.0, 1), mission(0, 50.0, 1)]);
        records.extend((0..4).map(|_| mission(1, 50.0, 1)));
        records.extend([mission(2, 50.0, 1), mission(2, 50.0, 0)]);
        records.push(mission(3, 50.0, 0));
        records.extend([mission(7, 50.0, 0), mission(7, 50.0, 1)]);
        records.push(mission(9, 50.0, 1));
        let dataset = MissionDataset::new(records);

        let ranking = dataset.filter(&dataset.default_filter()).top_terrains();
        let labels: Vec<&str> = ranking.iter().map(|r| r.terrain_label.as_str()).collect();

        assert_eq!(ranking.len(), TOP_TERRAIN_LIMIT);
        assert_eq!(labels, vec!["Type 1", "Type 0", "9", "7", "Type 2"]);
        for pair in ranking.windows(2) {
            assert!(
                pair[0].success_rate > pair[1].success_rate
                    || (pair[0].success_rate == pair[1].success_rate
                        && pair[0].missions >= pair[1].missions)
            );
        }
    }

    #[test]
    fn test_top_terrains_fewer_than_limit() {
        let dataset = sample_dataset();
        let ranking = dataset.filter(&dataset.default_filter()).top_terrains();

        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].terrain_label.as_str(), "Type 1");
        assert_eq!(ranking[0].missions, 1);
        assert!((ranking[1].success_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scatter_points_carry_terrain_label() {
        let dataset = sample_dataset();
        let points = dataset.filter(&dataset.default_filter()).scatter_points();

        assert_eq!(points.len(), 3);
        let json = serde_json::to_value(&points[2]).unwrap();
        assert_eq!(json["TerrainLabel"], "Type 1");
        assert_eq!(json["BatteryLevel"], 90.0);
        assert_eq!(json["MissionSuccess"], 1);
    }
}
