//! # Myxo - GPU mold-growth simulation engine
//!
//! A large population of agent particles stepped every frame entirely on the
//! GPU: agents sense a volumetric pheromone trail field through a cone of
//! samples, steer toward density, collide with static terrain, deposit into
//! the field, age, die, and respawn. A diffuse/evaporate pass blurs and decays
//! the field each tick, and a goal-detection kernel integrates density around
//! a target point and reports completion through an asynchronous readback.
//!
//! Myxo is the simulation core only. Rendering is left to the host: the
//! engine hands out the *stable* (not-currently-written) trail texture each
//! frame and the host raymarches or otherwise samples it.
//!
//! ## Quick Start
//!
//! ```ignore
//! use myxo::prelude::*;
//!
//! let ctx = pollster::block_on(GpuContext::new())?;
//!
//! let terrain = TerrainField::from_density(ctx.device(), ctx.queue(), 128, &densities)?;
//!
//! let mut sim = MoldSim::new(
//!     ctx.device(),
//!     ctx.queue(),
//!     MoldSimDesc {
//!         volume_size: 128,
//!         spawner: SpawnerConfig::new(Vec3::new(26.0, 64.0, 64.0))
//!             .with_spawn_rate(2000.0)
//!             .with_target_count(200_000),
//!         goal: GoalConfig::new(Vec3::new(102.0, 64.0, 64.0)),
//!         params: SimParams::default(),
//!         terrain: &terrain,
//!     },
//! )?;
//!
//! // Per frame:
//! sim.tick(delta_time, Vec3::new(0.0, -1.0, 0.0))?;
//! let stable = &sim.textures()[sim.stable_buffer_index()];
//! // ... hand `stable` to the renderer
//! ```
//!
//! ## Tick protocol
//!
//! Each [`MoldSim::tick`] encodes one command buffer with a fixed dispatch
//! sequence: spawn → diffuse/evaporate → agent update → respawn → goal check.
//! The two trail textures ping/pong; within a tick one is read-only "old"
//! state and the other is the write target, and the roles flip after
//! submission. External readers only ever see the stable buffer, one frame
//! in arrears.
//!
//! ## Double buffering
//!
//! | Accessor | Meaning |
//! |----------|---------|
//! | [`MoldSim::current_buffer_index`] | buffer the next tick writes into |
//! | [`MoldSim::stable_buffer_index`]  | buffer safe for external readers |
//!
//! The goal readback never blocks the tick loop: the result is mapped
//! asynchronously and drained on a later tick, so [`MoldSim::goal_reached`]
//! may trail the GPU-side detection by a frame or more. That latency is part
//! of the design, not an error.

pub mod agent;
pub mod config;
mod context;
pub mod error;
pub mod field;
mod goal;
pub mod kernels;
mod sim;
pub mod spawner;
pub mod terrain;

pub use agent::{AgentGpu, AGENT_CAPACITY, AGENT_STRIDE};
pub use config::{GoalConfig, SimParams, SpawnerConfig};
pub use context::GpuContext;
pub use error::{ConfigError, GpuError, SimError};
pub use field::TrailField;
pub use glam::Vec3;
pub use sim::{MoldSim, MoldSimDesc};
pub use spawner::{SpawnRange, Spawner};
pub use terrain::{TerrainField, SOLID_THRESHOLD};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use myxo::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{GoalConfig, SimParams, SpawnerConfig};
    pub use crate::context::GpuContext;
    pub use crate::error::{ConfigError, GpuError, SimError};
    pub use crate::sim::{MoldSim, MoldSimDesc};
    pub use crate::terrain::TerrainField;
    pub use crate::Vec3;
}
