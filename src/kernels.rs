//! WGSL compute kernels and their pipelines.
//!
//! All five kernels share a common prelude (the `Agent` and `Params`
//! structs, the PCG hash RNG and its sampling helpers) and take every
//! resource through bind groups. Sources are assembled once at pipeline
//! creation; nothing is specialized per frame.
//!
//! Dispatch order within a tick is fixed: `spawn`, `blur`, `update_agents`,
//! `respawn`, `check_goal`. The blur and agent kernels both write the same
//! destination volume; agents overwrite blurred voxels they deposit into,
//! which reads as fresh trail punching through the diffusion haze and is
//! intentional.

use bytemuck::{Pod, Zeroable};

/// Threads per workgroup for the agent, spawn and respawn kernels.
pub const AGENT_WORKGROUP_SIZE: u32 = 64;

/// Threads per workgroup axis for the blur kernel.
pub const BLUR_WORKGROUP_SIZE: u32 = 4;

/// Per-tick uniform block shared by every kernel.
///
/// Layout mirrors the WGSL `Params` struct: seven 16-byte rows, the vec3s
/// each packed with a scalar in their fourth lane.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ParamsGpu {
    pub delta_time: f32,
    pub move_speed: f32,
    pub sensor_angle: f32,
    pub sensor_distance: f32,

    pub turn_speed: f32,
    pub evaporation_rate: f32,
    pub aging_multiplier: f32,
    pub contact_threshold: f32,

    pub gravity_dir: [f32; 3],
    pub gravity_strength: f32,

    pub spawn_point: [f32; 3],
    pub spawn_radius: f32,

    pub goal_position: [f32; 3],
    pub goal_radius: f32,

    pub death_threshold: f32,
    pub max_lifetime: f32,
    pub goal_density_threshold: f32,
    pub volume_size: f32,

    pub spawn_start: u32,
    pub spawn_count: u32,
    pub active_count: u32,
    pub frame: u32,
}

/// Shared declarations prepended to every kernel source.
const PRELUDE: &str = r#"
struct Agent {
    position: vec3<f32>,
    is_active: f32,
    direction: vec3<f32>,
    time_since_contact: f32,
    total_lifetime: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
}

struct Params {
    delta_time: f32,
    move_speed: f32,
    sensor_angle: f32,
    sensor_distance: f32,
    turn_speed: f32,
    evaporation_rate: f32,
    aging_multiplier: f32,
    contact_threshold: f32,
    gravity_dir: vec3<f32>,
    gravity_strength: f32,
    spawn_point: vec3<f32>,
    spawn_radius: f32,
    goal_position: vec3<f32>,
    goal_radius: f32,
    death_threshold: f32,
    max_lifetime: f32,
    goal_density_threshold: f32,
    volume_size: f32,
    spawn_start: u32,
    spawn_count: u32,
    active_count: u32,
    frame: u32,
}

const TAU: f32 = 6.28318530718;
const SOLID_THRESHOLD: f32 = 0.07;
const OFF_VOLUME: f32 = -10000.0;

fn pcg(input: u32) -> u32 {
    let state = input * 747796405u + 2891336453u;
    let word = ((state >> ((state >> 28u) + 4u)) ^ state) * 277803737u;
    return (word >> 22u) ^ word;
}

fn rand01(state: ptr<function, u32>) -> f32 {
    *state = pcg(*state);
    return f32(*state) / 4294967295.0;
}

fn rand_unit_vector(state: ptr<function, u32>) -> vec3<f32> {
    let z = rand01(state) * 2.0 - 1.0;
    let a = rand01(state) * TAU;
    let r = sqrt(max(1.0 - z * z, 0.0));
    return vec3<f32>(r * cos(a), r * sin(a), z);
}

fn rand_in_sphere(state: ptr<function, u32>) -> vec3<f32> {
    let dir = rand_unit_vector(state);
    let radius = pow(rand01(state), 0.3333333);
    return dir * radius;
}

fn rand_in_hemisphere(state: ptr<function, u32>, normal: vec3<f32>) -> vec3<f32> {
    let v = rand_unit_vector(state);
    return select(v, -v, dot(v, normal) < 0.0);
}

// Perpendicular via the axis the direction is least aligned with, so the
// cross product never degenerates.
fn least_aligned_perp(dir: vec3<f32>) -> vec3<f32> {
    let a = abs(dir);
    var axis = vec3<f32>(1.0, 0.0, 0.0);
    if (a.y <= a.x && a.y <= a.z) {
        axis = vec3<f32>(0.0, 1.0, 0.0);
    } else if (a.z <= a.x && a.z <= a.y) {
        axis = vec3<f32>(0.0, 0.0, 1.0);
    }
    return normalize(cross(dir, axis));
}
"#;

/// Spawn and respawn entry points. Both populate a dormant slot the same
/// way; they differ only in which slots they visit and their seed stream.
const POPULATION_BODY: &str = r#"
@group(0) @binding(0) var<storage, read_write> agents: array<Agent>;
@group(0) @binding(1) var<uniform> params: Params;

fn activate(slot: u32, state: ptr<function, u32>) {
    let position = params.spawn_point + rand_in_sphere(state) * params.spawn_radius;
    let center = vec3<f32>(params.volume_size * 0.5);
    var heading = center - position;
    if (length(heading) < 0.001) {
        heading = vec3<f32>(0.0, 1.0, 0.0);
    }
    agents[slot] = Agent(position, 1.0, normalize(heading), 0.0, 0.0, 0.0, 0.0, 0.0);
}

@compute @workgroup_size(64)
fn spawn(@builtin(global_invocation_id) id: vec3<u32>) {
    if (id.x >= params.spawn_count) {
        return;
    }
    let slot = params.spawn_start + id.x;
    var state = pcg(slot ^ pcg(params.frame));
    activate(slot, &state);
}

@compute @workgroup_size(64)
fn respawn(@builtin(global_invocation_id) id: vec3<u32>) {
    let slot = id.x;
    if (slot >= params.active_count) {
        return;
    }
    if (agents[slot].is_active >= 0.5) {
        return;
    }
    // Decorrelated from the spawn stream so recycled agents do not retrace
    // the batch they died in.
    var state = pcg((slot + 2654435761u) ^ pcg(params.frame));
    activate(slot, &state);
}
"#;

/// Diffuse-and-evaporate pass over the whole volume.
const BLUR_BODY: &str = r#"
@group(0) @binding(0) var old_field: texture_3d<f32>;
@group(0) @binding(1) var new_field: texture_storage_3d<rg32float, write>;
@group(0) @binding(2) var<uniform> params: Params;

@compute @workgroup_size(4, 4, 4)
fn blur(@builtin(global_invocation_id) id: vec3<u32>) {
    let dims = textureDimensions(old_field);
    if (id.x >= dims.x || id.y >= dims.y || id.z >= dims.z) {
        return;
    }

    // Bounded 27-voxel box average. Edge voxels average fewer samples
    // instead of pulling zeros in from outside, so density is not bled
    // through the walls.
    var sum = 0.0;
    var count = 0.0;
    for (var dz = -1; dz <= 1; dz++) {
        for (var dy = -1; dy <= 1; dy++) {
            for (var dx = -1; dx <= 1; dx++) {
                let p = vec3<i32>(id) + vec3<i32>(dx, dy, dz);
                if (p.x >= 0 && p.y >= 0 && p.z >= 0
                    && p.x < i32(dims.x) && p.y < i32(dims.y) && p.z < i32(dims.z)) {
                    sum += textureLoad(old_field, vec3<u32>(p), 0).x;
                    count += 1.0;
                }
            }
        }
    }

    let density = max(sum / count - params.evaporation_rate, 0.0);

    var lifetime = textureLoad(old_field, id, 0).y;
    if (density < 0.01) {
        lifetime = 0.0;
    }

    textureStore(new_field, id, vec4<f32>(density, lifetime, 0.0, 1.0));
}
"#;

/// Sense-and-move pass over every agent slot.
const AGENT_BODY: &str = r#"
@group(0) @binding(0) var old_field: texture_3d<f32>;
@group(0) @binding(1) var new_field: texture_storage_3d<rg32float, write>;
@group(0) @binding(2) var terrain: texture_3d<f32>;
@group(0) @binding(3) var<storage, read_write> agents: array<Agent>;
@group(0) @binding(4) var<uniform> params: Params;

fn field_density(pos: vec3<f32>) -> f32 {
    let dims = vec3<f32>(textureDimensions(old_field));
    let p = clamp(pos, vec3<f32>(0.0), dims - 1.0);
    return textureLoad(old_field, vec3<u32>(p), 0).x;
}

fn terrain_density(pos: vec3<f32>) -> f32 {
    let dims = vec3<f32>(textureDimensions(terrain));
    let p = clamp(pos, vec3<f32>(0.0), dims - 1.0);
    return textureLoad(terrain, vec3<u32>(p), 0).x;
}

fn terrain_normal(pos: vec3<f32>) -> vec3<f32> {
    let o = 2.0;
    let grad = vec3<f32>(
        terrain_density(pos + vec3<f32>(o, 0.0, 0.0)) - terrain_density(pos - vec3<f32>(o, 0.0, 0.0)),
        terrain_density(pos + vec3<f32>(0.0, o, 0.0)) - terrain_density(pos - vec3<f32>(0.0, o, 0.0)),
        terrain_density(pos + vec3<f32>(0.0, 0.0, o)) - terrain_density(pos - vec3<f32>(0.0, 0.0, o))
    );
    if (length(grad) <= 0.001) {
        return vec3<f32>(0.0, 1.0, 0.0);
    }
    // Density increases into the solid, so the surface normal is the
    // negated gradient.
    return normalize(-grad);
}

// Eight samples around the sensing cone. Returns the weighted sum of
// sensor directions in xyz and the total weight in w.
fn sense(position: vec3<f32>, direction: vec3<f32>) -> vec4<f32> {
    let perp = least_aligned_perp(direction);
    let perp2 = cross(direction, perp);
    var steer_target = vec3<f32>(0.0);
    var total_weight = 0.0;
    for (var i = 0u; i < 8u; i++) {
        let theta = (f32(i) / 8.0) * TAU;
        let cone_offset = perp * cos(theta) + perp2 * sin(theta);
        let sensor_dir = normalize(direction + cone_offset * sin(params.sensor_angle));
        let sample_pos = position + sensor_dir * params.sensor_distance;
        // Trail inside walls is nearly worthless, not strictly forbidden.
        let penalty = select(1.0, 0.01, terrain_density(sample_pos) > SOLID_THRESHOLD);
        let weight = field_density(sample_pos) * penalty;
        steer_target += sensor_dir * weight;
        total_weight += weight;
    }
    return vec4<f32>(steer_target, total_weight);
}

@compute @workgroup_size(64)
fn update_agents(@builtin(global_invocation_id) id: vec3<u32>) {
    let index = id.x;
    if (index >= arrayLength(&agents)) {
        return;
    }
    var agent = agents[index];
    if (agent.is_active < 0.5) {
        return;
    }

    var state = pcg(index ^ (params.frame * 747796405u));
    let dims = vec3<f32>(textureDimensions(old_field));
    var direction = agent.direction;

    // Steer toward sensed trail, or wander when there is nothing to smell.
    let sensed = sense(agent.position, direction);
    if (sensed.w > 0.01) {
        let steer_target = normalize(sensed.xyz / sensed.w);
        direction = normalize(direction + steer_target * params.turn_speed * params.delta_time);
    } else {
        let perp = least_aligned_perp(direction);
        let perp2 = cross(direction, perp);
        let angle = rand01(&state) * TAU;
        let wobble = perp * cos(angle) + perp2 * sin(angle);
        direction = normalize(direction + wobble * params.turn_speed * params.delta_time);
    }

    if (params.gravity_strength > 0.0) {
        direction = normalize(direction + params.gravity_dir * params.gravity_strength * params.delta_time);
    }

    // Predictive collision: look two steps ahead and reflect off the
    // surface before impact, with a perturbation so columns of agents do
    // not bounce in lockstep.
    let move_dist = params.move_speed * params.delta_time;
    let ahead = agent.position + direction * move_dist * 2.0;
    if (terrain_density(ahead) > SOLID_THRESHOLD) {
        let n = terrain_normal(ahead);
        direction = normalize(reflect(direction, n) + rand_in_sphere(&state) * 0.2);
    }

    var new_pos = agent.position + direction * move_dist;

    // Still landed inside a wall: push out one unit along the normal.
    if (terrain_density(new_pos) > SOLID_THRESHOLD) {
        let n = terrain_normal(new_pos);
        new_pos = agent.position + n;
    }

    // Per-axis clamp to the volume, then re-aim escapees inward.
    var inward = vec3<f32>(0.0);
    var escaped = false;
    if (new_pos.x < 0.0) {
        new_pos.x = 0.0; inward.x = 1.0; escaped = true;
    } else if (new_pos.x > dims.x - 1.0) {
        new_pos.x = dims.x - 1.0; inward.x = -1.0; escaped = true;
    }
    if (new_pos.y < 0.0) {
        new_pos.y = 0.0; inward.y = 1.0; escaped = true;
    } else if (new_pos.y > dims.y - 1.0) {
        new_pos.y = dims.y - 1.0; inward.y = -1.0; escaped = true;
    }
    if (new_pos.z < 0.0) {
        new_pos.z = 0.0; inward.z = 1.0; escaped = true;
    } else if (new_pos.z > dims.z - 1.0) {
        new_pos.z = dims.z - 1.0; inward.z = -1.0; escaped = true;
    }
    if (escaped) {
        let center_dir = normalize(dims * 0.5 - new_pos);
        let wander = rand_in_hemisphere(&state, normalize(inward));
        direction = normalize(wander * 0.3 + center_dir * 0.7);
    }

    // Contact and aging bookkeeping reads last tick's completed field.
    let voxel = vec3<u32>(clamp(new_pos, vec3<f32>(0.0), dims - 1.0));
    let old_val = textureLoad(old_field, voxel, 0);

    var time_since_contact = agent.time_since_contact + params.delta_time;
    if (old_val.x > params.contact_threshold) {
        time_since_contact = 0.0;
    }
    let total_lifetime = agent.total_lifetime + params.delta_time * params.aging_multiplier;

    if (time_since_contact > params.death_threshold || total_lifetime > params.max_lifetime) {
        agents[index].is_active = 0.0;
        agents[index].position = vec3<f32>(OFF_VOLUME);
        agents[index].time_since_contact = 0.0;
        agents[index].total_lifetime = 0.0;
        return;
    }

    // Deposit: bump density by one and fold this agent's normalized age
    // into the lifetime channel, weighted by what is already there.
    let lifetime_norm = total_lifetime / params.max_lifetime;
    let new_density = old_val.x + 1.0;
    var lifetime = lifetime_norm;
    if (old_val.x > 0.1) {
        lifetime = (old_val.y * old_val.x + lifetime_norm) / new_density;
    }
    textureStore(new_field, voxel, vec4<f32>(new_density, lifetime, 0.0, 1.0));

    agents[index].position = new_pos;
    agents[index].direction = direction;
    agents[index].time_since_contact = time_since_contact;
    agents[index].total_lifetime = total_lifetime;
}
"#;

/// Goal detection: a single invocation sums density in a sphere around the
/// goal and raises the latch flag at the threshold.
const GOAL_BODY: &str = r#"
@group(0) @binding(0) var field: texture_3d<f32>;
@group(0) @binding(1) var<storage, read_write> goal_flag: array<u32>;
@group(0) @binding(2) var<uniform> params: Params;

@compute @workgroup_size(1)
fn check_goal(@builtin(global_invocation_id) id: vec3<u32>) {
    if (id.x != 0u) {
        return;
    }
    if (goal_flag[0] != 0u) {
        return;
    }

    let dims = vec3<i32>(textureDimensions(field));
    let center = vec3<i32>(params.goal_position);
    let r = i32(ceil(params.goal_radius));
    let r_sq = params.goal_radius * params.goal_radius;

    var sum = 0.0;
    for (var dz = -r; dz <= r; dz++) {
        for (var dy = -r; dy <= r; dy++) {
            for (var dx = -r; dx <= r; dx++) {
                let offset = vec3<i32>(dx, dy, dz);
                let p = center + offset;
                if (p.x < 0 || p.y < 0 || p.z < 0
                    || p.x >= dims.x || p.y >= dims.y || p.z >= dims.z) {
                    continue;
                }
                let d = vec3<f32>(offset);
                if (dot(d, d) > r_sq) {
                    continue;
                }
                sum += textureLoad(field, vec3<u32>(p), 0).x;
            }
        }
    }

    if (sum >= params.goal_density_threshold) {
        goal_flag[0] = 1u;
    }
}
"#;

/// Spawn/respawn kernel source.
pub fn population_source() -> String {
    format!("{}\n{}", PRELUDE, POPULATION_BODY)
}

/// Diffuse-and-evaporate kernel source.
pub fn blur_source() -> String {
    format!("{}\n{}", PRELUDE, BLUR_BODY)
}

/// Agent update kernel source.
pub fn agent_source() -> String {
    format!("{}\n{}", PRELUDE, AGENT_BODY)
}

/// Goal check kernel source.
pub fn goal_source() -> String {
    format!("{}\n{}", PRELUDE, GOAL_BODY)
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: false },
            view_dimension: wgpu::TextureViewDimension::D3,
            multisampled: false,
        },
        count: None,
    }
}

fn storage_texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::StorageTexture {
            access: wgpu::StorageTextureAccess::WriteOnly,
            format: wgpu::TextureFormat::Rg32Float,
            view_dimension: wgpu::TextureViewDimension::D3,
        },
        count: None,
    }
}

fn build_pipeline(
    device: &wgpu::Device,
    label: &str,
    source: &str,
    entry_point: &str,
    entries: &[wgpu::BindGroupLayoutEntry],
) -> (wgpu::ComputePipeline, wgpu::BindGroupLayout) {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(&format!("{} Bind Group Layout", label)),
        entries,
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{} Pipeline Layout", label)),
        bind_group_layouts: &[&bind_group_layout],
        push_constant_ranges: &[],
    });

    let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some(&format!("{} Pipeline", label)),
        layout: Some(&pipeline_layout),
        module: &shader,
        entry_point: Some(entry_point),
        compilation_options: Default::default(),
        cache: None,
    });

    (pipeline, bind_group_layout)
}

/// Spawn and respawn pipelines sharing one bind group layout.
pub fn create_population_pipelines(
    device: &wgpu::Device,
) -> (wgpu::ComputePipeline, wgpu::ComputePipeline, wgpu::BindGroupLayout) {
    let source = population_source();
    let (spawn, layout) = build_pipeline(
        device,
        "Spawn",
        &source,
        "spawn",
        &[storage_entry(0, false), uniform_entry(1)],
    );
    let (respawn, _) = build_pipeline(
        device,
        "Respawn",
        &source,
        "respawn",
        &[storage_entry(0, false), uniform_entry(1)],
    );
    (spawn, respawn, layout)
}

pub fn create_blur_pipeline(
    device: &wgpu::Device,
) -> (wgpu::ComputePipeline, wgpu::BindGroupLayout) {
    build_pipeline(
        device,
        "Trail Blur",
        &blur_source(),
        "blur",
        &[texture_entry(0), storage_texture_entry(1), uniform_entry(2)],
    )
}

pub fn create_agent_pipeline(
    device: &wgpu::Device,
) -> (wgpu::ComputePipeline, wgpu::BindGroupLayout) {
    build_pipeline(
        device,
        "Agent Update",
        &agent_source(),
        "update_agents",
        &[
            texture_entry(0),
            storage_texture_entry(1),
            texture_entry(2),
            storage_entry(3, false),
            uniform_entry(4),
        ],
    )
}

pub fn create_goal_pipeline(
    device: &wgpu::Device,
) -> (wgpu::ComputePipeline, wgpu::BindGroupLayout) {
    build_pipeline(
        device,
        "Goal Check",
        &goal_source(),
        "check_goal",
        &[texture_entry(0), storage_entry(1, false), uniform_entry(2)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates WGSL code using naga.
    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    #[test]
    fn test_population_kernel_validates() {
        validate_wgsl(&population_source()).expect("population WGSL should be valid");
    }

    #[test]
    fn test_blur_kernel_validates() {
        validate_wgsl(&blur_source()).expect("blur WGSL should be valid");
    }

    #[test]
    fn test_agent_kernel_validates() {
        validate_wgsl(&agent_source()).expect("agent WGSL should be valid");
    }

    #[test]
    fn test_goal_kernel_validates() {
        validate_wgsl(&goal_source()).expect("goal WGSL should be valid");
    }

    #[test]
    fn test_params_block_size() {
        // Seven 16-byte rows; the WGSL struct must agree exactly.
        assert_eq!(std::mem::size_of::<ParamsGpu>(), 112);
    }

    #[test]
    fn test_entry_points_present() {
        assert!(population_source().contains("fn spawn("));
        assert!(population_source().contains("fn respawn("));
        assert!(blur_source().contains("fn blur("));
        assert!(agent_source().contains("fn update_agents("));
        assert!(goal_source().contains("fn check_goal("));
    }

    #[test]
    fn test_workgroup_sizes_match_constants() {
        assert!(agent_source().contains("@workgroup_size(64)"));
        assert!(population_source().contains("@workgroup_size(64)"));
        assert!(blur_source().contains("@workgroup_size(4, 4, 4)"));
        assert!(goal_source().contains("@workgroup_size(1)"));
        assert_eq!(AGENT_WORKGROUP_SIZE, 64);
        assert_eq!(BLUR_WORKGROUP_SIZE, 4);
    }

    #[test]
    fn test_blur_evaporation_clamps_at_zero() {
        // Density floors at zero instead of saturating to one; trail
        // density is unbounded above.
        assert!(blur_source().contains("max(sum / count - params.evaporation_rate, 0.0)"));
        assert!(!blur_source().contains("saturate"));
    }

    #[test]
    fn test_agent_kernel_reads_old_writes_new() {
        let src = agent_source();
        assert!(src.contains("var old_field: texture_3d<f32>"));
        assert!(src.contains("var new_field: texture_storage_3d<rg32float, write>"));
        assert!(src.contains("textureStore(new_field"));
    }

    #[test]
    fn test_goal_flag_is_latched_gpu_side() {
        let src = goal_source();
        assert!(src.contains("if (goal_flag[0] != 0u)"));
        assert!(src.contains("goal_flag[0] = 1u"));
    }

    #[test]
    fn test_agent_struct_matches_cpu_layout() {
        // Three trailing pad floats bring the stride to 48 bytes.
        let src = agent_source();
        assert!(src.contains("_pad0: f32"));
        assert!(src.contains("_pad2: f32"));
        assert_eq!(crate::agent::AGENT_STRIDE, 48);
    }
}
