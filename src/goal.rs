//! Host side of goal detection.
//!
//! The kernel raises a flag in a storage buffer; getting that flag back to
//! the CPU must not stall the tick loop, so the readback is asynchronous:
//! after submission the flag is copied to a mappable staging buffer and
//! `map_async` posts its outcome into a shared slot that [`GoalDetector::poll`]
//! drains on a later tick. While a map is in flight the goal kernel is not
//! dispatched again. `reached` latches true permanently; a failed mapping
//! marks the detector unavailable for the rest of the session.

use std::sync::{Arc, Mutex};

use wgpu::util::DeviceExt;

use crate::config::GoalConfig;
use crate::error::SimError;

pub struct GoalDetector {
    flag_buffer: wgpu::Buffer,
    staging: wgpu::Buffer,
    pending: Arc<Mutex<Option<Result<(), ()>>>>,
    inflight: bool,
    reached: bool,
    failed: bool,
    config: GoalConfig,
}

impl GoalDetector {
    pub fn new(device: &wgpu::Device, config: GoalConfig) -> Self {
        let flag_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Goal Flag"),
            contents: bytemuck::bytes_of(&0u32),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
        });
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Goal Flag Staging"),
            size: std::mem::size_of::<u32>() as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            flag_buffer,
            staging,
            pending: Arc::new(Mutex::new(None)),
            inflight: false,
            reached: false,
            failed: false,
            config,
        }
    }

    pub fn flag_buffer(&self) -> &wgpu::Buffer {
        &self.flag_buffer
    }

    pub fn config(&self) -> &GoalConfig {
        &self.config
    }

    pub fn reached(&self) -> bool {
        self.reached
    }

    /// Whether the goal kernel (and the copy to staging) should be encoded
    /// this tick. Skipped once reached, while a map is in flight, and after
    /// a failure.
    pub fn should_dispatch(&self) -> bool {
        !self.reached && !self.inflight && !self.failed
    }

    /// Encode the flag copy into the tick's command buffer, after the goal
    /// kernel dispatch.
    pub fn encode_copy(&self, encoder: &mut wgpu::CommandEncoder) {
        encoder.copy_buffer_to_buffer(
            &self.flag_buffer,
            0,
            &self.staging,
            0,
            std::mem::size_of::<u32>() as u64,
        );
    }

    /// Start mapping the staging buffer. Call after the tick's submission.
    /// The callback fires during some later device poll.
    pub fn kickoff_readback(&mut self) {
        if self.inflight || self.reached || self.failed {
            return;
        }
        self.inflight = true;
        let slot = Arc::clone(&self.pending);
        self.staging.slice(..).map_async(wgpu::MapMode::Read, move |res| {
            if let Ok(mut pending) = slot.lock() {
                *pending = Some(res.map_err(|_| ()));
            }
        });
    }

    /// Drain a completed mapping, if any. Non-blocking.
    pub fn poll(&mut self) -> Result<(), SimError> {
        if self.failed {
            return Err(SimError::Unavailable);
        }
        let outcome = match self.pending.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => return Err(SimError::Unavailable),
        };
        let Some(result) = outcome else {
            return Ok(());
        };
        self.inflight = false;
        match result {
            Ok(()) => {
                let value: u32 = {
                    let view = self.staging.slice(..).get_mapped_range();
                    *bytemuck::from_bytes(&view[..])
                };
                self.staging.unmap();
                apply_readback(&mut self.reached, &mut self.failed, Ok(value));
                if self.reached {
                    log::info!("goal reached");
                }
                Ok(())
            }
            Err(()) => {
                apply_readback(&mut self.reached, &mut self.failed, Err(()));
                log::warn!("goal readback mapping failed, simulation unavailable");
                Err(SimError::Unavailable)
            }
        }
    }
}

/// Latch update for one delivered readback.
fn apply_readback(reached: &mut bool, failed: &mut bool, outcome: Result<u32, ()>) {
    match outcome {
        Ok(value) => *reached = *reached || value != 0,
        Err(()) => *failed = true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reached_latches() {
        let mut reached = false;
        let mut failed = false;
        apply_readback(&mut reached, &mut failed, Ok(0));
        assert!(!reached);
        apply_readback(&mut reached, &mut failed, Ok(1));
        assert!(reached);
        // Later zero deliveries never clear the latch.
        apply_readback(&mut reached, &mut failed, Ok(0));
        assert!(reached);
        assert!(!failed);
    }

    #[test]
    fn test_mapping_error_marks_failed() {
        let mut reached = false;
        let mut failed = false;
        apply_readback(&mut reached, &mut failed, Err(()));
        assert!(failed);
        assert!(!reached);
    }

    #[test]
    fn test_failure_does_not_unlatch() {
        let mut reached = true;
        let mut failed = false;
        apply_readback(&mut reached, &mut failed, Err(()));
        assert!(reached);
        assert!(failed);
    }
}
