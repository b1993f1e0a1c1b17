//! Mission outcome simulation for UGV field trials.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use ugv_domain::MissionRecord;

/// Highest terrain code generated
pub const MAX_TERRAIN_TYPE: i64 = 3;

/// Logistic gain used unless overridden
pub const DEFAULT_DIFFICULTY_GAIN: f64 = 1.0;

/// Mission simulator producing plausible telemetry/outcome rows.
pub struct MissionSimulator {
    rng: StdRng,
    /// Scales the logistic success score; higher means more decisive outcomes
    difficulty_gain: f64,
}

impl MissionSimulator {
    /// Create a simulator seeded from system entropy.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Create a reproducible simulator.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            difficulty_gain: DEFAULT_DIFFICULTY_GAIN,
        }
    }

    /// Set how strongly conditions drive the outcome. Non-finite gains keep
    /// the default.
    #[must_use]
    pub fn with_difficulty_gain(mut self, gain: f64) -> Self {
        self.difficulty_gain = if gain.is_finite() {
            gain.clamp(0.25, 4.0)
        } else {
            DEFAULT_DIFFICULTY_GAIN
        };
        self
    }

    /// Simulate a single mission.
    pub fn simulate_mission(&mut self) -> MissionRecord {
        let terrain_type = self.rng.gen_range(0..=MAX_TERRAIN_TYPE);
        let battery_level = self.rng.gen_range(10.0..=100.0);
        let payload_weight = self.rng.gen_range(0.0..=50.0);
        let comm_quality = self.rng.gen_range(0.2..=1.0);
        let sensor_health = self.rng.gen_range(0.3..=1.0);
        let obstacle_density = self.rng.gen_range(0.0..=1.0);

        let terrain = terrain_type as f64;
        let speed = (6.0 - 0.8 * terrain - 2.0 * obstacle_density + 0.7 * self.noise()).clamp(0.5, 10.0);
        let mission_time = (20.0 + 0.6 * payload_weight + 40.0 * obstacle_density + 5.0 * terrain
            + 8.0 * self.noise())
        .clamp(5.0, 120.0);

        let probability = self.success_probability(
            battery_level,
            comm_quality,
            sensor_health,
            obstacle_density,
            terrain,
        );
        let mission_success = u8::from(self.rng.gen_bool(probability));

        MissionRecord {
            terrain_type,
            battery_level: round2(battery_level),
            payload_weight: round2(payload_weight),
            comm_quality: round2(comm_quality),
            sensor_health: round2(sensor_health),
            obstacle_density: round2(obstacle_density),
            speed: round2(speed),
            mission_time: round2(mission_time),
            mission_success,
        }
    }

    /// Simulate multiple missions.
    pub fn simulate_batch(&mut self, count: usize) -> Vec<MissionRecord> {
        (0..count).map(|_| self.simulate_mission()).collect()
    }

    /// Logistic success probability from mission conditions.
    fn success_probability(
        &self,
        battery_level: f64,
        comm_quality: f64,
        sensor_health: f64,
        obstacle_density: f64,
        terrain: f64,
    ) -> f64 {
        let score = 0.04 * (battery_level - 55.0)
            + 2.5 * (comm_quality - 0.6)
            + 3.0 * (sensor_health - 0.65)
            - 3.5 * (obstacle_density - 0.5)
            - 0.3 * (terrain - 1.5);
        let probability = 1.0 / (1.0 + (-self.difficulty_gain * score).exp());
        probability.clamp(0.02, 0.98)
    }

    fn noise(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }
}

impl Default for MissionSimulator {
    fn default() -> Self {
        Self::new()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulate_mission_ranges() {
        let mut sim = MissionSimulator::with_seed(7);
        for mission in sim.simulate_batch(200) {
            assert!((0..=MAX_TERRAIN_TYPE).contains(&mission.terrain_type));
            assert!((10.0..=100.0).contains(&mission.battery_level));
            assert!((0.0..=50.0).contains(&mission.payload_weight));
            assert!((0.0..=1.0).contains(&mission.obstacle_density));
            assert!((0.5..=10.0).contains(&mission.speed));
            assert!((5.0..=120.0).contains(&mission.mission_time));
            assert!(mission.mission_success <= 1);
        }
    }

    #[test]
    fn test_seed_is_reproducible() {
        let a = MissionSimulator::with_seed(42).simulate_batch(20);
        let b = MissionSimulator::with_seed(42).simulate_batch(20);
        assert_eq!(a, b);
    }

    #[test]
    fn test_batch_simulation() {
        let mut sim = MissionSimulator::with_seed(3);
        let missions = sim.simulate_batch(500);

        assert_eq!(missions.len(), 500);

        // Outcomes are mixed, not all one way
        let successes = missions.iter().filter(|m| m.succeeded()).count();
        assert!(successes > 50 && successes < 450);
    }

    #[test]
    fn test_non_finite_difficulty_keeps_default() {
        let mut sim = MissionSimulator::with_seed(5).with_difficulty_gain(f64::NAN);
        assert!((sim.difficulty_gain - DEFAULT_DIFFICULTY_GAIN).abs() < f64::EPSILON);
        assert_eq!(sim.simulate_batch(50).len(), 50);

        let sim = MissionSimulator::with_seed(5).with_difficulty_gain(f64::INFINITY);
        assert!((sim.difficulty_gain - DEFAULT_DIFFICULTY_GAIN).abs() < f64::EPSILON);

        let sim = MissionSimulator::with_seed(5).with_difficulty_gain(10.0);
        assert!((sim.difficulty_gain - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_harsh_conditions_lower_success() {
        let sim = MissionSimulator::with_seed(1);
        let easy = sim.success_probability(95.0, 0.95, 0.95, 0.05, 0.0);
        let hard = sim.success_probability(15.0, 0.25, 0.35, 0.95, 3.0);
        assert!(easy > 0.9);
        assert!(hard < 0.1);
    }
}
