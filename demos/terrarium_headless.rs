//! Headless terrarium run.
//!
//! Builds a simple SDF terrain (a floor and a pillar between spawner and
//! goal), ticks the simulation at 60 Hz and logs population and goal state.
//! No rendering; this demonstrates the full engine loop and doubles as a
//! smoke test on real hardware.

use myxo::prelude::*;
use rand::Rng;

const VOLUME_SIZE: u32 = 128;

fn sd_box(p: Vec3, center: Vec3, half: Vec3) -> f32 {
    let q = (p - center).abs() - half;
    q.max(Vec3::ZERO).length() + q.max_element().min(0.0)
}

fn build_terrain() -> Vec<f32> {
    let mut rng = rand::thread_rng();
    let s = VOLUME_SIZE as usize;
    let mut densities = Vec::with_capacity(s * s * s);
    for z in 0..s {
        for y in 0..s {
            for x in 0..s {
                let p = Vec3::new(x as f32, y as f32, z as f32);
                let floor = p.y - 20.0;
                let pillar = sd_box(
                    p,
                    Vec3::new(64.0, 50.0, 64.0),
                    Vec3::new(8.0, 30.0, 8.0),
                );
                let sdf = floor.min(pillar);
                // Jitter roughens the surface so agents do not slide along
                // perfectly flat walls.
                let jitter: f32 = rng.gen_range(-0.5..0.5);
                densities.push(if sdf + jitter < 0.0 { 1.0 } else { 0.0 });
            }
        }
    }
    densities
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let ctx = pollster::block_on(GpuContext::new())?;

    let densities = build_terrain();
    let terrain = TerrainField::from_density(ctx.device(), ctx.queue(), VOLUME_SIZE, &densities)?;

    let mut sim = MoldSim::new(
        ctx.device(),
        ctx.queue(),
        MoldSimDesc {
            volume_size: VOLUME_SIZE,
            spawner: SpawnerConfig::new(Vec3::new(26.0, 30.0, 64.0))
                .with_spawn_rate(2000.0)
                .with_target_count(200_000),
            goal: GoalConfig::new(Vec3::new(102.0, 30.0, 64.0)),
            params: SimParams::default().with_gravity_strength(0.5),
            terrain: &terrain,
        },
    )?;

    let dt = 1.0 / 60.0;
    let gravity = Vec3::new(0.0, -1.0, 0.0);

    for frame in 0..1800u32 {
        sim.tick(dt, gravity)?;

        if frame % 60 == 0 {
            log::info!(
                "frame {frame}: {} active agents, stable buffer {}",
                sim.active_agent_count(),
                sim.stable_buffer_index()
            );
        }
        if sim.goal_reached() {
            log::info!("goal reached at frame {frame}");
            break;
        }
    }

    if !sim.goal_reached() {
        log::info!("goal not reached within the run");
    }
    Ok(())
}
