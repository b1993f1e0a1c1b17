//! DuckDB engine for mission dataset ingest and export.

use crate::error::{AnalyticsError, Result};
use duckdb::{Connection, params};
use std::path::Path;
use ugv_domain::MissionRecord;

/// Raw row as stored in DuckDB, before domain validation.
type RawMission = (i64, f64, f64, f64, f64, f64, f64, f64, i64);

/// DuckDB-backed store for the mission table.
pub struct AnalyticsEngine {
    conn: Connection,
}

impl AnalyticsEngine {
    /// Create a new in-memory engine.
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let engine = Self { conn };
        engine.initialize_schema()?;
        Ok(engine)
    }

    /// Initialize the mission schema.
    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS missions (
                TerrainType BIGINT NOT NULL,
                BatteryLevel DOUBLE NOT NULL,
                PayloadWeight DOUBLE NOT NULL,
                CommQuality DOUBLE NOT NULL,
                SensorHealth DOUBLE NOT NULL,
                ObstacleDensity DOUBLE NOT NULL,
                Speed DOUBLE NOT NULL,
                MissionTime DOUBLE NOT NULL,
                MissionSuccess BIGINT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Replace the mission table with the contents of a CSV file.
    ///
    /// Returns the number of rows read.
    pub fn load_csv<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(AnalyticsError::DatasetNotFound(path.to_path_buf()));
        }

        self.conn.execute("DELETE FROM missions", [])?;

        let query = format!(
            r"
            INSERT INTO missions
            SELECT
                CAST(TerrainType AS BIGINT),
                CAST(BatteryLevel AS DOUBLE),
                CAST(PayloadWeight AS DOUBLE),
                CAST(CommQuality AS DOUBLE),
                CAST(SensorHealth AS DOUBLE),
                CAST(ObstacleDensity AS DOUBLE),
                CAST(Speed AS DOUBLE),
                CAST(MissionTime AS DOUBLE),
                CAST(MissionSuccess AS BIGINT)
            FROM read_csv_auto('{}', header = true)
            ",
            sql_path(path)
        );
        let count = self.conn.execute(&query, [])?;

        tracing::debug!(path = %path.display(), rows = count, "CSV ingested into DuckDB");
        Ok(count)
    }

    /// Ingest mission records.
    pub fn ingest_missions(&self, missions: &[MissionRecord]) -> Result<usize> {
        let mut stmt = self.conn.prepare(
            r"
            INSERT INTO missions (
                TerrainType, BatteryLevel, PayloadWeight, CommQuality, SensorHealth,
                ObstacleDensity, Speed, MissionTime, MissionSuccess
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )?;

        let mut count = 0;
        for mission in missions {
            stmt.execute(params![
                mission.terrain_type,
                mission.battery_level,
                mission.payload_weight,
                mission.comm_quality,
                mission.sensor_health,
                mission.obstacle_density,
                mission.speed,
                mission.mission_time,
                i64::from(mission.mission_success),
            ])?;
            count += 1;
        }
        Ok(count)
    }

    /// Read every mission row in table order.
    pub fn missions(&self) -> Result<Vec<MissionRecord>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT
                TerrainType, BatteryLevel, PayloadWeight, CommQuality, SensorHealth,
                ObstacleDensity, Speed, MissionTime, MissionSuccess
            FROM missions
            ",
        )?;

        let rows = stmt.query_map([], |row| -> duckdb::Result<RawMission> {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
                row.get(8)?,
            ))
        })?;

        let raw = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        raw.into_iter().map(into_record).collect()
    }

    /// Export the mission table to a CSV file with a header row.
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let query = format!(
            "COPY missions TO '{}' (HEADER, DELIMITER ',')",
            sql_path(path)
        );
        self.conn.execute(&query, [])?;
        Ok(())
    }
}

fn into_record(raw: RawMission) -> Result<MissionRecord> {
    let (
        terrain_type,
        battery_level,
        payload_weight,
        comm_quality,
        sensor_health,
        obstacle_density,
        speed,
        mission_time,
        mission_success,
    ) = raw;

    Ok(MissionRecord {
        terrain_type,
        battery_level,
        payload_weight,
        comm_quality,
        sensor_health,
        obstacle_density,
        speed,
        mission_time,
        mission_success: MissionRecord::parse_success(mission_success)?,
    })
}

/// Quote a filesystem path for use inside a SQL string literal.
fn sql_path(path: &Path) -> String {
    path.display().to_string().replace('\'', "''")
}
