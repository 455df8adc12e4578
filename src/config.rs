//! Configuration for the mold simulation.
//!
//! Three config structs cover the three tunable surfaces: [`SimParams`] for
//! the behavioral constants shared by every kernel, [`SpawnerConfig`] for
//! population growth, and [`GoalConfig`] for the completion detector. All of
//! them are builder-style with clamped setters; defaults reproduce the stock
//! terrarium behavior.

use glam::Vec3;

use crate::agent::AGENT_CAPACITY;

/// Behavioral tuning for the agent and field kernels.
///
/// Default values:
/// - `move_speed`: 30.0 (world units per second)
/// - `sensor_angle`: 0.5 (radians, half-angle of the sensing cone)
/// - `sensor_distance`: 9.0 (world units ahead of the agent)
/// - `turn_speed`: 10.0 (steering responsiveness)
/// - `evaporation_rate`: 0.05 (density subtracted per blur pass)
/// - `contact_threshold`: 0.01 (trail density that counts as contact)
/// - `death_threshold`: 3.0 (seconds without contact before death)
/// - `max_lifetime`: 5.0 (seconds, normalizes the lifetime channel)
/// - `gravity_strength`: 0.0 (no gravity bias)
#[derive(Clone, Copy, Debug)]
pub struct SimParams {
    /// Distance an agent travels per second.
    pub move_speed: f32,
    /// Half-angle of the sensor cone, radians.
    pub sensor_angle: f32,
    /// How far ahead of the agent the sensor cone samples.
    pub sensor_distance: f32,
    /// Steering responsiveness toward the weighted sensor direction.
    pub turn_speed: f32,
    /// Density removed from every voxel each diffusion pass.
    pub evaporation_rate: f32,
    /// Trail density at the agent's voxel that resets its contact timer.
    pub contact_threshold: f32,
    /// Seconds without trail contact before an agent deactivates.
    pub death_threshold: f32,
    /// Maximum agent age in seconds. Also normalizes `total_lifetime`
    /// into the field's lifetime channel.
    pub max_lifetime: f32,
    /// Strength of the per-tick gravity direction blended into headings.
    pub gravity_strength: f32,
}

impl SimParams {
    /// Set the movement speed (clamped to >= 0).
    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed.max(0.0);
        self
    }

    /// Set the sensor cone half-angle in radians (clamped to [0, pi/2]).
    pub fn with_sensor_angle(mut self, angle: f32) -> Self {
        self.sensor_angle = angle.clamp(0.0, std::f32::consts::FRAC_PI_2);
        self
    }

    /// Set the sensor sampling distance (clamped to >= 0).
    pub fn with_sensor_distance(mut self, distance: f32) -> Self {
        self.sensor_distance = distance.max(0.0);
        self
    }

    /// Set the steering responsiveness (clamped to >= 0).
    pub fn with_turn_speed(mut self, speed: f32) -> Self {
        self.turn_speed = speed.max(0.0);
        self
    }

    /// Set the per-pass evaporation rate (clamped to >= 0).
    pub fn with_evaporation_rate(mut self, rate: f32) -> Self {
        self.evaporation_rate = rate.max(0.0);
        self
    }

    /// Set the starvation window in seconds (clamped to > 0).
    pub fn with_death_threshold(mut self, seconds: f32) -> Self {
        self.death_threshold = seconds.max(f32::EPSILON);
        self
    }

    /// Set the maximum agent age in seconds (clamped to > 0).
    pub fn with_max_lifetime(mut self, seconds: f32) -> Self {
        self.max_lifetime = seconds.max(f32::EPSILON);
        self
    }

    /// Set the gravity bias strength (clamped to >= 0).
    pub fn with_gravity_strength(mut self, strength: f32) -> Self {
        self.gravity_strength = strength.max(0.0);
        self
    }
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            move_speed: 30.0,
            sensor_angle: 0.5,
            sensor_distance: 9.0,
            turn_speed: 10.0,
            evaporation_rate: 0.05,
            contact_threshold: 0.01,
            death_threshold: 3.0,
            max_lifetime: 5.0,
            gravity_strength: 0.0,
        }
    }
}

/// Population growth configuration.
///
/// A spawner with `spawn_rate == 0.0` or `target_count == 0` is legal and
/// never activates anyone; hosts use that to keep an instance dormant.
#[derive(Clone, Copy, Debug)]
pub struct SpawnerConfig {
    /// Center of the spawn sphere, in voxel coordinates.
    pub spawn_point: Vec3,
    /// Radius of the sphere new agents appear in.
    pub spawn_radius: f32,
    /// Agents activated per second while below target.
    pub spawn_rate: f32,
    /// Population ceiling. Never exceeded, approached monotonically.
    pub target_count: u32,
    /// Agent store capacity. `target_count` must not exceed this.
    pub capacity: u32,
}

impl SpawnerConfig {
    /// Create a spawner at the given point.
    ///
    /// Defaults: radius 5.0, rate 2000 agents/s, target 200 000,
    /// capacity [`AGENT_CAPACITY`].
    pub fn new(spawn_point: Vec3) -> Self {
        Self {
            spawn_point,
            spawn_radius: 5.0,
            spawn_rate: 2000.0,
            target_count: 200_000,
            capacity: AGENT_CAPACITY,
        }
    }

    /// Set the spawn sphere radius (clamped to >= 0).
    pub fn with_spawn_radius(mut self, radius: f32) -> Self {
        self.spawn_radius = radius.max(0.0);
        self
    }

    /// Set the spawn rate in agents per second (clamped to >= 0).
    pub fn with_spawn_rate(mut self, rate: f32) -> Self {
        self.spawn_rate = rate.max(0.0);
        self
    }

    /// Set the target population.
    pub fn with_target_count(mut self, target: u32) -> Self {
        self.target_count = target;
        self
    }

    /// Set the agent store capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }
}

/// Goal detection configuration.
#[derive(Clone, Copy, Debug)]
pub struct GoalConfig {
    /// Center of the detection region, in voxel coordinates.
    pub position: Vec3,
    /// Radius of the sphere whose density is summed.
    pub radius: f32,
    /// Accumulated density at which the goal fires.
    pub density_threshold: f32,
}

impl GoalConfig {
    /// Create a goal at the given point.
    ///
    /// Defaults: radius 4.0, density threshold 100.0.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            radius: 4.0,
            density_threshold: 100.0,
        }
    }

    /// Set the detection radius (clamped to >= 0).
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius.max(0.0);
        self
    }

    /// Set the firing threshold (clamped to >= 0).
    pub fn with_density_threshold(mut self, threshold: f32) -> Self {
        self.density_threshold = threshold.max(0.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_params_defaults() {
        let p = SimParams::default();
        assert!((p.move_speed - 30.0).abs() < 0.001);
        assert!((p.sensor_angle - 0.5).abs() < 0.001);
        assert!((p.sensor_distance - 9.0).abs() < 0.001);
        assert!((p.turn_speed - 10.0).abs() < 0.001);
        assert!((p.evaporation_rate - 0.05).abs() < 0.001);
        assert!((p.contact_threshold - 0.01).abs() < 0.001);
        assert!((p.death_threshold - 3.0).abs() < 0.001);
        assert!((p.max_lifetime - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_sim_params_clamping() {
        let p = SimParams::default()
            .with_move_speed(-5.0)
            .with_sensor_angle(10.0)
            .with_evaporation_rate(-1.0);
        assert_eq!(p.move_speed, 0.0);
        assert!((p.sensor_angle - std::f32::consts::FRAC_PI_2).abs() < 0.001);
        assert_eq!(p.evaporation_rate, 0.0);
    }

    #[test]
    fn test_sim_params_death_window_never_zero() {
        let p = SimParams::default().with_death_threshold(0.0).with_max_lifetime(-2.0);
        assert!(p.death_threshold > 0.0);
        assert!(p.max_lifetime > 0.0);
    }

    #[test]
    fn test_spawner_config_defaults() {
        let c = SpawnerConfig::new(Vec3::new(10.0, 20.0, 30.0));
        assert!((c.spawn_radius - 5.0).abs() < 0.001);
        assert!((c.spawn_rate - 2000.0).abs() < 0.001);
        assert_eq!(c.target_count, 200_000);
        assert_eq!(c.capacity, AGENT_CAPACITY);
    }

    #[test]
    fn test_spawner_config_builder() {
        let c = SpawnerConfig::new(Vec3::ZERO)
            .with_spawn_radius(2.0)
            .with_spawn_rate(500.0)
            .with_target_count(1000);
        assert!((c.spawn_radius - 2.0).abs() < 0.001);
        assert!((c.spawn_rate - 500.0).abs() < 0.001);
        assert_eq!(c.target_count, 1000);
    }

    #[test]
    fn test_goal_config_defaults() {
        let g = GoalConfig::new(Vec3::splat(64.0));
        assert!((g.radius - 4.0).abs() < 0.001);
        assert!((g.density_threshold - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_goal_config_clamping() {
        let g = GoalConfig::new(Vec3::ZERO).with_radius(-1.0).with_density_threshold(-5.0);
        assert_eq!(g.radius, 0.0);
        assert_eq!(g.density_threshold, 0.0);
    }
}
