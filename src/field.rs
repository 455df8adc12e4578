//! Double-buffered volumetric trail field.
//!
//! Two identical `rg32float` 3D textures ping/pong every tick. The red
//! channel holds unbounded trail density; the green channel holds the
//! normalized lifetime of the most recent depositors, which renderers use
//! for color ramps.
//!
//! Within a tick exactly one buffer is "current": the kernels read the
//! other buffer and write into the current one. After submission the roles
//! flip. External readers are only ever handed the *stable* buffer, the one
//! not being written this tick, so they see a complete field one frame in
//! arrears.

/// Texture format of the trail field: density in `.r`, lifetime in `.g`.
pub const TRAIL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rg32Float;

/// Which of the two buffers is the write target. Kept apart from the GPU
/// resources so the flip discipline is testable without a device.
#[derive(Debug)]
struct PingPong {
    current: usize,
}

impl PingPong {
    fn new() -> Self {
        Self { current: 0 }
    }

    fn current_index(&self) -> usize {
        self.current
    }

    fn stable_index(&self) -> usize {
        1 - self.current
    }

    fn swap(&mut self) {
        self.current = 1 - self.current;
    }
}

/// The ping/pong pair of trail volumes.
pub struct TrailField {
    textures: [wgpu::Texture; 2],
    views: [wgpu::TextureView; 2],
    size: u32,
    ring: PingPong,
}

impl TrailField {
    /// Create both volumes zero-initialized.
    pub fn new(device: &wgpu::Device, size: u32) -> Self {
        let make = |i: usize| {
            device.create_texture(&wgpu::TextureDescriptor {
                label: Some(&format!("Trail Field {}", i)),
                size: wgpu::Extent3d {
                    width: size,
                    height: size,
                    depth_or_array_layers: size,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D3,
                format: TRAIL_FORMAT,
                usage: wgpu::TextureUsages::STORAGE_BINDING
                    | wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            })
        };
        let textures = [make(0), make(1)];
        let views = [
            textures[0].create_view(&wgpu::TextureViewDescriptor::default()),
            textures[1].create_view(&wgpu::TextureViewDescriptor::default()),
        ];
        log::debug!("trail field created: 2x {size}^3 rg32float");
        Self {
            textures,
            views,
            size,
            ring: PingPong::new(),
        }
    }

    /// Voxels per axis.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Index of the buffer targeted for writes this tick.
    pub fn current_index(&self) -> usize {
        self.ring.current_index()
    }

    /// Index of the buffer safe for external readers this tick.
    ///
    /// This is the buffer the kernels are *reading*, i.e. last tick's
    /// completed output. Renderers must bind this one, never the current
    /// write target.
    pub fn stable_index(&self) -> usize {
        self.ring.stable_index()
    }

    pub fn texture(&self, index: usize) -> &wgpu::Texture {
        &self.textures[index]
    }

    pub fn view(&self, index: usize) -> &wgpu::TextureView {
        &self.views[index]
    }

    /// View of the buffer kernels read from this tick.
    pub fn read_view(&self) -> &wgpu::TextureView {
        &self.views[self.stable_index()]
    }

    /// View of the buffer kernels write into this tick.
    pub fn write_view(&self) -> &wgpu::TextureView {
        &self.views[self.current_index()]
    }

    /// Flip the buffer roles. Called once per tick, after submission.
    pub fn swap(&mut self) {
        self.ring.swap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_is_never_current() {
        let mut ring = PingPong::new();
        for _ in 0..4 {
            assert_ne!(ring.stable_index(), ring.current_index());
            assert_eq!(ring.stable_index(), 1 - ring.current_index());
            ring.swap();
        }
    }

    #[test]
    fn test_swap_alternates() {
        let mut ring = PingPong::new();
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push((ring.current_index(), ring.stable_index()));
            ring.swap();
        }
        assert_eq!(seen, vec![(0, 1), (1, 0), (0, 1), (1, 0)]);
    }

    #[test]
    fn test_trail_format_is_two_channel() {
        assert_eq!(TRAIL_FORMAT, wgpu::TextureFormat::Rg32Float);
    }
}
