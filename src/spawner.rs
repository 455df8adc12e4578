//! Host-side population bookkeeping.
//!
//! The spawner decides *which slots* activate each tick; the GPU spawn
//! kernel decides *where* they appear. Activation is rate-limited through a
//! fractional accumulator so sub-1-per-tick rates still spawn, and the
//! active count only ever grows toward the target. Death does not shrink
//! it: dead slots inside `[0, active_count)` are recycled in place by the
//! respawn kernel.

use crate::config::SpawnerConfig;
use crate::error::ConfigError;

/// Half-open index interval `[start, end)` of agent slots to activate
/// this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnRange {
    pub start: u32,
    pub end: u32,
}

impl SpawnRange {
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Rate-limited activation of agent slots.
pub struct Spawner {
    config: SpawnerConfig,
    active_count: u32,
    accumulator: f32,
}

impl Spawner {
    /// Validates that the target fits the store. Silent truncation of the
    /// target would leave ghost slots the respawn kernel never scans, so a
    /// too-large target is an error.
    pub fn new(config: SpawnerConfig) -> Result<Self, ConfigError> {
        if config.target_count > config.capacity {
            return Err(ConfigError::TargetExceedsCapacity {
                target: config.target_count,
                capacity: config.capacity,
            });
        }
        Ok(Self {
            config,
            active_count: 0,
            accumulator: 0.0,
        })
    }

    /// Advance one tick. Returns the slot range to activate, if any.
    pub fn tick(&mut self, dt: f32) -> Option<SpawnRange> {
        if self.active_count >= self.config.target_count {
            return None;
        }

        self.accumulator += dt * self.config.spawn_rate;
        let to_spawn = self.accumulator.floor();
        self.accumulator -= to_spawn;

        // `to_spawn as u32` saturates for enormous rate*dt products, so the
        // add must saturate too instead of wrapping past the target.
        let new_active = self
            .active_count
            .saturating_add(to_spawn as u32)
            .min(self.config.target_count);
        if new_active == self.active_count {
            return None;
        }

        let range = SpawnRange {
            start: self.active_count,
            end: new_active,
        };
        log::trace!(
            "spawning {} agents ({} -> {})",
            range.len(),
            self.active_count,
            new_active
        );
        self.active_count = new_active;
        Some(range)
    }

    /// Slots that have ever been activated. The respawn kernel scans
    /// `[0, active_count)` every tick.
    pub fn active_count(&self) -> u32 {
        self.active_count
    }

    pub fn config(&self) -> &SpawnerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn spawner(rate: f32, target: u32) -> Spawner {
        Spawner::new(
            SpawnerConfig::new(Vec3::splat(64.0))
                .with_spawn_rate(rate)
                .with_target_count(target),
        )
        .unwrap()
    }

    #[test]
    fn test_target_exceeding_capacity_rejected() {
        let config = SpawnerConfig::new(Vec3::ZERO)
            .with_capacity(100)
            .with_target_count(101);
        match Spawner::new(config) {
            Err(ConfigError::TargetExceedsCapacity { target, capacity }) => {
                assert_eq!(target, 101);
                assert_eq!(capacity, 100);
            }
            other => panic!("expected TargetExceedsCapacity, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_target_equal_to_capacity_allowed() {
        let config = SpawnerConfig::new(Vec3::ZERO)
            .with_capacity(100)
            .with_target_count(100);
        assert!(Spawner::new(config).is_ok());
    }

    #[test]
    fn test_instant_full_spawn() {
        // Rate far above target: one tick saturates the population.
        let mut s = spawner(1_000_000.0, 1);
        let range = s.tick(1.0).unwrap();
        assert_eq!(range, SpawnRange { start: 0, end: 1 });
        assert_eq!(s.active_count(), 1);
        assert!(s.tick(1.0).is_none());
    }

    #[test]
    fn test_monotone_growth_to_target() {
        let mut s = spawner(10.0, 25);
        let mut last = 0;
        for _ in 0..100 {
            s.tick(0.5);
            assert!(s.active_count() >= last);
            assert!(s.active_count() <= 25);
            last = s.active_count();
        }
        assert_eq!(s.active_count(), 25);
    }

    #[test]
    fn test_fractional_accumulation() {
        // 0.5 agents/s at 1 s ticks spawns on every second tick.
        let mut s = spawner(0.5, 10);
        assert!(s.tick(1.0).is_none());
        let range = s.tick(1.0).unwrap();
        assert_eq!(range.len(), 1);
        assert!(s.tick(1.0).is_none());
        assert_eq!(s.tick(1.0).unwrap().len(), 1);
        assert_eq!(s.active_count(), 2);
    }

    #[test]
    fn test_ranges_are_contiguous() {
        let mut s = spawner(3.0, 10);
        let mut next_start = 0;
        for _ in 0..10 {
            if let Some(range) = s.tick(1.0) {
                assert_eq!(range.start, next_start);
                assert!(range.end > range.start);
                next_start = range.end;
            }
        }
        assert_eq!(next_start, 10);
    }

    #[test]
    fn test_zero_target_never_spawns() {
        let mut s = spawner(1000.0, 0);
        for _ in 0..10 {
            assert!(s.tick(1.0).is_none());
        }
        assert_eq!(s.active_count(), 0);
    }

    #[test]
    fn test_zero_rate_never_spawns() {
        let mut s = spawner(0.0, 100);
        for _ in 0..10 {
            assert!(s.tick(1.0).is_none());
        }
        assert_eq!(s.active_count(), 0);
    }

    #[test]
    fn test_extreme_rate_saturates_without_overflow() {
        // A legal config can push rate*dt past u32 range; the count must
        // pin at the target instead of wrapping.
        let config = SpawnerConfig::new(Vec3::ZERO)
            .with_capacity(u32::MAX)
            .with_target_count(u32::MAX)
            .with_spawn_rate(1e9);
        let mut s = Spawner::new(config).unwrap();
        let first = s.tick(0.001).unwrap();
        assert_eq!(first.start, 0);
        let second = s.tick(10.0).unwrap();
        assert_eq!(second.start, first.end);
        assert_eq!(second.end, u32::MAX);
        assert_eq!(s.active_count(), u32::MAX);
        assert!(s.tick(10.0).is_none());
    }

    #[test]
    fn test_burst_clamped_to_target() {
        let mut s = spawner(100.0, 7);
        let range = s.tick(1.0).unwrap();
        assert_eq!(range, SpawnRange { start: 0, end: 7 });
        assert_eq!(s.active_count(), 7);
    }
}
