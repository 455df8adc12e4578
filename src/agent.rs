//! GPU-resident agent store.
//!
//! Agents live in a single fixed-capacity storage buffer for the whole
//! session. Slots are never freed; death flips `is_active` to 0 and the
//! respawn kernel recycles the slot in place on a later tick.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Default number of agent slots in the store.
pub const AGENT_CAPACITY: u32 = 800_000;

/// Byte stride of one agent, identical on the CPU and in WGSL.
pub const AGENT_STRIDE: usize = std::mem::size_of::<AgentGpu>();

/// Position placed on inactive agents so they never contribute to the field
/// even if a kernel forgets to check the flag.
const INACTIVE_SENTINEL: f32 = -10_000.0;

/// One agent as laid out in the GPU storage buffer.
///
/// `is_active` and the timers ride in the vec3 padding lanes so the struct
/// packs to 48 bytes with explicit trailing padding, matching the WGSL
/// declaration field for field.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct AgentGpu {
    /// Position in voxel coordinates.
    pub position: [f32; 3],
    /// 1.0 = simulated, 0.0 = dormant slot awaiting respawn.
    pub is_active: f32,
    /// Unit heading.
    pub direction: [f32; 3],
    /// Seconds since the agent last stood on appreciable trail density.
    pub time_since_contact: f32,
    /// Seconds since activation, scaled by the host's aging multiplier.
    pub total_lifetime: f32,
    pub _pad: [f32; 3],
}

impl AgentGpu {
    /// A dormant slot: inactive, parked far outside the volume.
    pub fn inactive() -> Self {
        Self {
            position: [INACTIVE_SENTINEL; 3],
            is_active: 0.0,
            direction: [0.0, 1.0, 0.0],
            time_since_contact: 0.0,
            total_lifetime: 0.0,
            _pad: [0.0; 3],
        }
    }
}

/// The agent storage buffer plus its capacity.
pub struct AgentStore {
    buffer: wgpu::Buffer,
    capacity: u32,
}

impl AgentStore {
    /// Allocate the store with every slot dormant.
    pub fn new(device: &wgpu::Device, capacity: u32) -> Self {
        let initial = vec![AgentGpu::inactive(); capacity as usize];
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Agent Store"),
            contents: bytemuck::cast_slice(&initial),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });
        log::debug!(
            "agent store allocated: {} slots, {} MiB",
            capacity,
            (capacity as usize * AGENT_STRIDE) >> 20
        );
        Self { buffer, capacity }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}
