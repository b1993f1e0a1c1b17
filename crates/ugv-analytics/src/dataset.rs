//! Immutable mission dataset and filtered views over it.

use crate::engine::AnalyticsEngine;
use crate::error::Result;
use std::path::Path;
use ugv_domain::{BatteryRange, MissionFilter, MissionRecord, SuccessFilter, TerrainLabel};

/// The full mission dataset. Loaded once, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MissionDataset {
    records: Vec<MissionRecord>,
}

impl MissionDataset {
    pub fn new(records: Vec<MissionRecord>) -> Self {
        Self { records }
    }

    /// Load the dataset from a CSV file through DuckDB.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let engine = AnalyticsEngine::new_in_memory()?;
        engine.load_csv(path)?;
        let records = engine.missions()?;

        tracing::info!(path = %path.display(), rows = records.len(), "Mission dataset loaded");
        Ok(Self { records })
    }

    pub fn records(&self) -> &[MissionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct terrain labels present in the dataset, sorted.
    pub fn terrain_options(&self) -> Vec<TerrainLabel> {
        let mut labels: Vec<TerrainLabel> =
            self.records.iter().map(MissionRecord::terrain_label).collect();
        labels.sort();
        labels.dedup();
        labels
    }

    /// Whole-number slider bounds covering every battery level.
    pub fn battery_bounds(&self) -> Option<BatteryRange> {
        let mut levels = self.records.iter().map(|r| r.battery_level);
        let first = levels.next()?;
        let (min, max) = levels.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(BatteryRange::new(min.floor(), max.ceil()))
    }

    /// Selection that includes every record: all terrains, full battery range, any outcome.
    pub fn default_filter(&self) -> MissionFilter {
        MissionFilter::new(
            self.terrain_options(),
            self.battery_bounds()
                .unwrap_or_else(|| BatteryRange::new(0.0, 100.0)),
            SuccessFilter::All,
        )
    }

    /// Evaluate a filter, borrowing the matching records.
    pub fn filter(&self, filter: &MissionFilter) -> FilteredMissions<'_> {
        let records: Vec<&MissionRecord> =
            self.records.iter().filter(|r| filter.matches(r)).collect();

        tracing::debug!(
            selected = records.len(),
            total = self.records.len(),
            terrains = filter.terrains.len(),
            success = %filter.success,
            "Filter evaluated"
        );
        FilteredMissions { records }
    }
}

impl From<Vec<MissionRecord>> for MissionDataset {
    fn from(records: Vec<MissionRecord>) -> Self {
        Self::new(records)
    }
}

/// Non-owning subset of a [`MissionDataset`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredMissions<'a> {
    records: Vec<&'a MissionRecord>,
}

impl<'a> FilteredMissions<'a> {
    pub fn records(&self) -> &[&'a MissionRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a MissionRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn mission(terrain_type: i64, battery_level: f64, mission_success: u8) -> MissionRecord {
        MissionRecord {
            terrain_type,
            battery_level,
            payload_weight: 10.0,
            comm_quality: 0.8,
            sensor_health: 0.9,
            obstacle_density: 0.5,
            speed: 4.0,
            mission_time: 30.0,
            mission_success,
        }
    }

    /// Three missions: (T0, B50, S1), (T0, B80, S0), (T1, B90, S1).
    pub(crate) fn sample_dataset() -> MissionDataset {
        MissionDataset::new(vec![
            mission(0, 50.0, 1),
            mission(0, 80.0, 0),
            mission(1, 90.0, 1),
        ])
    }

    #[test]
    fn test_all_inclusive_filter() {
        let dataset = sample_dataset();
        let filter = MissionFilter::new(
            dataset.terrain_options(),
            BatteryRange::new(50.0, 90.0),
            SuccessFilter::All,
        );

        assert_eq!(dataset.filter(&filter).len(), 3);
    }

    #[test]
    fn test_success_only_filter() {
        let dataset = sample_dataset();
        let filter = MissionFilter {
            success: SuccessFilter::SuccessOnly,
            ..dataset.default_filter()
        };
        let filtered = dataset.filter(&filter);

        let expected: Vec<&MissionRecord> =
            vec![&dataset.records()[0], &dataset.records()[2]];
        assert_eq!(filtered.records(), expected.as_slice());
    }

    #[test]
    fn test_filtered_subset_satisfies_predicate() {
        let dataset = sample_dataset();
        let filter = MissionFilter::new(
            [TerrainLabel::from("Type 0")],
            BatteryRange::new(60.0, 100.0),
            SuccessFilter::FailureOnly,
        );
        let filtered = dataset.filter(&filter);

        assert_eq!(filtered.len(), 1);
        for record in filtered.iter() {
            assert!(filter.matches(record));
            assert!(dataset.records().contains(record));
        }
    }

    #[test]
    fn test_filter_is_idempotent() {
        let dataset = sample_dataset();
        let filter = MissionFilter::new(
            [TerrainLabel::from("Type 0"), TerrainLabel::from("Type 1")],
            BatteryRange::new(70.0, 95.0),
            SuccessFilter::All,
        );

        assert_eq!(dataset.filter(&filter), dataset.filter(&filter));
    }

    #[test]
    fn test_empty_terrain_selection() {
        let dataset = sample_dataset();
        let filter = MissionFilter::new(
            Vec::<TerrainLabel>::new(),
            BatteryRange::new(0.0, 100.0),
            SuccessFilter::All,
        );

        assert!(dataset.filter(&filter).is_empty());
    }

    #[test]
    fn test_terrain_options_sorted_and_unique() {
        let dataset = MissionDataset::new(vec![
            mission(2, 10.0, 1),
            mission(0, 10.0, 1),
            mission(2, 10.0, 0),
            mission(5, 10.0, 0),
        ]);

        let labels: Vec<String> = dataset
            .terrain_options()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(labels, vec!["5", "Type 0", "Type 2"]);
    }

    #[test]
    fn test_battery_bounds_cover_all_levels() {
        let dataset = MissionDataset::new(vec![mission(0, 12.4, 1), mission(1, 97.6, 0)]);
        let bounds = dataset.battery_bounds().unwrap();

        assert!((bounds.min - 12.0).abs() < f64::EPSILON);
        assert!((bounds.max - 98.0).abs() < f64::EPSILON);
        assert!(MissionDataset::default().battery_bounds().is_none());
        assert_eq!(dataset.filter(&dataset.default_filter()).len(), 2);
    }
}
