//! Tick orchestration.
//!
//! [`MoldSim`] owns every GPU resource of one simulation instance and
//! encodes one command buffer per tick with a fixed dispatch sequence:
//! spawn, diffuse/evaporate, agent update, respawn, goal check. The trail
//! buffers flip after submission, so the buffer a renderer samples is
//! always last tick's completed output.

use bytemuck::Zeroable;
use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::agent::AgentStore;
use crate::config::{GoalConfig, SimParams, SpawnerConfig};
use crate::error::{ConfigError, SimError};
use crate::field::TrailField;
use crate::goal::GoalDetector;
use crate::kernels::{self, ParamsGpu, AGENT_WORKGROUP_SIZE, BLUR_WORKGROUP_SIZE};
use crate::spawner::Spawner;
use crate::terrain::TerrainField;

/// Everything needed to build a simulation instance.
pub struct MoldSimDesc<'a> {
    /// Voxels per axis of the trail volume. Must match the terrain.
    pub volume_size: u32,
    pub spawner: SpawnerConfig,
    pub goal: GoalConfig,
    pub params: SimParams,
    pub terrain: &'a TerrainField,
}

/// One running mold simulation.
pub struct MoldSim {
    device: wgpu::Device,
    queue: wgpu::Queue,

    field: TrailField,
    agents: AgentStore,
    spawner: Spawner,
    goal: GoalDetector,

    params: SimParams,
    aging_multiplier: f32,
    volume_size: u32,
    frame: u32,

    params_buffer: wgpu::Buffer,

    spawn_pipeline: wgpu::ComputePipeline,
    respawn_pipeline: wgpu::ComputePipeline,
    blur_pipeline: wgpu::ComputePipeline,
    agent_pipeline: wgpu::ComputePipeline,
    goal_pipeline: wgpu::ComputePipeline,

    population_bind_group: wgpu::BindGroup,
    /// Indexed by the current write-target buffer.
    blur_bind_groups: [wgpu::BindGroup; 2],
    agent_bind_groups: [wgpu::BindGroup; 2],
    goal_bind_groups: [wgpu::BindGroup; 2],
}

impl MoldSim {
    /// Compile all pipelines, allocate all resources and validate the
    /// configuration. The device and queue may be shared with a renderer.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        desc: MoldSimDesc<'_>,
    ) -> Result<Self, SimError> {
        if desc.volume_size < 8 {
            return Err(ConfigError::VolumeTooSmall {
                size: desc.volume_size,
            }
            .into());
        }
        if desc.terrain.size() != desc.volume_size {
            return Err(ConfigError::TerrainSizeMismatch {
                expected: (desc.volume_size as usize).pow(3),
                actual: (desc.terrain.size() as usize).pow(3),
            }
            .into());
        }

        let spawner = Spawner::new(desc.spawner)?;
        let field = TrailField::new(device, desc.volume_size);
        let agents = AgentStore::new(device, desc.spawner.capacity);
        let goal = GoalDetector::new(device, desc.goal);

        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sim Params"),
            contents: bytemuck::bytes_of(&ParamsGpu::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let (spawn_pipeline, respawn_pipeline, population_layout) =
            kernels::create_population_pipelines(device);
        let (blur_pipeline, blur_layout) = kernels::create_blur_pipeline(device);
        let (agent_pipeline, agent_layout) = kernels::create_agent_pipeline(device);
        let (goal_pipeline, goal_layout) = kernels::create_goal_pipeline(device);

        let population_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Population Bind Group"),
            layout: &population_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: agents.buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: params_buffer.as_entire_binding(),
                },
            ],
        });

        // One bind group per write-target buffer: when buffer i is current,
        // the kernels read buffer 1-i and write buffer i. The goal kernel
        // runs after the agent pass and inspects this tick's output, so it
        // binds buffer i read-only.
        let make_blur = |current: usize| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Blur Bind Group"),
                layout: &blur_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(field.view(1 - current)),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(field.view(current)),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: params_buffer.as_entire_binding(),
                    },
                ],
            })
        };
        let blur_bind_groups = [make_blur(0), make_blur(1)];

        let make_agent = |current: usize| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Agent Bind Group"),
                layout: &agent_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(field.view(1 - current)),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(field.view(current)),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(desc.terrain.view()),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: agents.buffer().as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 4,
                        resource: params_buffer.as_entire_binding(),
                    },
                ],
            })
        };
        let agent_bind_groups = [make_agent(0), make_agent(1)];

        let make_goal = |current: usize| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Goal Bind Group"),
                layout: &goal_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(field.view(current)),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: goal.flag_buffer().as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: params_buffer.as_entire_binding(),
                    },
                ],
            })
        };
        let goal_bind_groups = [make_goal(0), make_goal(1)];

        log::info!(
            "simulation created: {}^3 volume, capacity {}, target {}",
            desc.volume_size,
            desc.spawner.capacity,
            desc.spawner.target_count
        );

        Ok(Self {
            device: device.clone(),
            queue: queue.clone(),
            field,
            agents,
            spawner,
            goal,
            params: desc.params,
            aging_multiplier: 1.0,
            volume_size: desc.volume_size,
            frame: 0,
            params_buffer,
            spawn_pipeline,
            respawn_pipeline,
            blur_pipeline,
            agent_pipeline,
            goal_pipeline,
            population_bind_group,
            blur_bind_groups,
            agent_bind_groups,
            goal_bind_groups,
        })
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// `gravity_dir` is the host-supplied pull direction for this tick
    /// (world orientation usually changes it every frame); it is blended
    /// into agent headings at the configured gravity strength.
    pub fn tick(&mut self, dt: f32, gravity_dir: Vec3) -> Result<(), SimError> {
        self.goal.poll()?;

        self.frame = self.frame.wrapping_add(1);
        let spawn_range = self.spawner.tick(dt);
        let active_count = self.spawner.active_count();

        let spawner_config = *self.spawner.config();
        let goal_config = *self.goal.config();
        let gravity = gravity_dir.normalize_or_zero();
        let params = ParamsGpu {
            delta_time: dt,
            move_speed: self.params.move_speed,
            sensor_angle: self.params.sensor_angle,
            sensor_distance: self.params.sensor_distance,
            turn_speed: self.params.turn_speed,
            evaporation_rate: self.params.evaporation_rate,
            aging_multiplier: self.aging_multiplier,
            contact_threshold: self.params.contact_threshold,
            gravity_dir: gravity.to_array(),
            gravity_strength: self.params.gravity_strength,
            spawn_point: spawner_config.spawn_point.to_array(),
            spawn_radius: spawner_config.spawn_radius,
            goal_position: goal_config.position.to_array(),
            goal_radius: goal_config.radius,
            death_threshold: self.params.death_threshold,
            max_lifetime: self.params.max_lifetime,
            goal_density_threshold: goal_config.density_threshold,
            volume_size: self.volume_size as f32,
            spawn_start: spawn_range.map_or(0, |r| r.start),
            spawn_count: spawn_range.map_or(0, |r| r.len()),
            active_count,
            frame: self.frame,
        };
        self.queue
            .write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&params));

        let current = self.field.current_index();
        let check_goal = self.goal.should_dispatch();

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Sim Tick"),
            });

        if let Some(range) = spawn_range {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Spawn Pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.spawn_pipeline);
            pass.set_bind_group(0, &self.population_bind_group, &[]);
            pass.dispatch_workgroups(div_ceil(range.len(), AGENT_WORKGROUP_SIZE), 1, 1);
        }

        {
            let groups = div_ceil(self.volume_size, BLUR_WORKGROUP_SIZE);
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Blur Pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.blur_pipeline);
            pass.set_bind_group(0, &self.blur_bind_groups[current], &[]);
            pass.dispatch_workgroups(groups, groups, groups);
        }

        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Agent Pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.agent_pipeline);
            pass.set_bind_group(0, &self.agent_bind_groups[current], &[]);
            pass.dispatch_workgroups(
                div_ceil(self.agents.capacity(), AGENT_WORKGROUP_SIZE),
                1,
                1,
            );
        }

        if active_count > 0 {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Respawn Pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.respawn_pipeline);
            pass.set_bind_group(0, &self.population_bind_group, &[]);
            pass.dispatch_workgroups(div_ceil(active_count, AGENT_WORKGROUP_SIZE), 1, 1);
        }

        if check_goal {
            {
                let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                    label: Some("Goal Pass"),
                    timestamp_writes: None,
                });
                pass.set_pipeline(&self.goal_pipeline);
                pass.set_bind_group(0, &self.goal_bind_groups[current], &[]);
                pass.dispatch_workgroups(1, 1, 1);
            }
            self.goal.encode_copy(&mut encoder);
        }

        self.queue.submit(std::iter::once(encoder.finish()));

        if check_goal {
            self.goal.kickoff_readback();
        }
        // Give outstanding map callbacks a chance to fire without blocking.
        let _ = self.device.poll(wgpu::Maintain::Poll);
        self.goal.poll()?;

        self.field.swap();
        Ok(())
    }

    /// Index of the buffer the next tick will write into.
    pub fn current_buffer_index(&self) -> usize {
        self.field.current_index()
    }

    /// Index of the buffer safe for external readers right now: the most
    /// recently completed one, which the next tick only reads.
    pub fn stable_buffer_index(&self) -> usize {
        self.field.stable_index()
    }

    /// Both trail textures, for renderers that keep per-buffer bind groups.
    pub fn textures(&self) -> [&wgpu::Texture; 2] {
        [self.field.texture(0), self.field.texture(1)]
    }

    /// The most recently completed trail texture.
    pub fn stable_texture(&self) -> &wgpu::Texture {
        self.field.texture(self.stable_buffer_index())
    }

    /// Slots activated so far. Includes dead slots awaiting respawn.
    pub fn active_agent_count(&self) -> u32 {
        self.spawner.active_count()
    }

    pub fn goal_reached(&self) -> bool {
        self.goal.reached()
    }

    /// Host input scalar multiplying agent aging, >= 0. Hosts speed up or
    /// freeze the lifetime clock with this without touching `dt`.
    pub fn set_aging_multiplier(&mut self, multiplier: f32) {
        self.aging_multiplier = multiplier.max(0.0);
    }
}

fn div_ceil(n: u32, d: u32) -> u32 {
    n.div_ceil(d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_div_ceil() {
        assert_eq!(div_ceil(0, 64), 0);
        assert_eq!(div_ceil(1, 64), 1);
        assert_eq!(div_ceil(64, 64), 1);
        assert_eq!(div_ceil(65, 64), 2);
        assert_eq!(div_ceil(128, 4), 32);
    }
}
