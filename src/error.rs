//! Error types for Myxo.
//!
//! Construction-time configuration problems are rejected eagerly; runtime
//! failure of the simulation itself is limited to the goal readback, which is
//! fatal to the session when it fails.

use std::fmt;

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter => None,
        }
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors from invalid simulation configuration, rejected at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Target agent population exceeds the agent store capacity.
    /// Silent truncation would corrupt spawn-range bookkeeping.
    TargetExceedsCapacity { target: u32, capacity: u32 },
    /// Terrain density sample count does not match the simulation volume.
    TerrainSizeMismatch { expected: usize, actual: usize },
    /// Volume side length below the minimum the kernels support.
    VolumeTooSmall { size: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::TargetExceedsCapacity { target, capacity } => write!(
                f,
                "Target agent count {} exceeds agent store capacity {}",
                target, capacity
            ),
            ConfigError::TerrainSizeMismatch { expected, actual } => write!(
                f,
                "Terrain field has {} density samples, volume requires {}",
                actual, expected
            ),
            ConfigError::VolumeTooSmall { size } => {
                write!(f, "Volume size {} is below the minimum of 8", size)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors that can occur while running a simulation.
#[derive(Debug)]
pub enum SimError {
    /// Invalid configuration at construction.
    Config(ConfigError),
    /// The goal readback failed (device lost or mapping error). The
    /// simulation is unavailable for the rest of the session; the host
    /// decides whether to restart or abort.
    Unavailable,
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Config(e) => write!(f, "Invalid simulation configuration: {}", e),
            SimError::Unavailable => {
                write!(f, "Simulation unavailable: goal readback failed (device lost?)")
            }
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Config(e) => Some(e),
            SimError::Unavailable => None,
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        SimError::Config(e)
    }
}
