//! Error types for Spring Toy.
//!
//! The simulation core only fails at construction time (bad configuration or
//! a spring pointing at a node that does not exist). Everything else here
//! belongs to the window and GPU side of [`Simulation::run`](crate::Simulation::run).

use std::fmt;

/// A configuration value outside its valid range.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    /// Name of the offending `SimConfig` field.
    pub field: &'static str,
    /// What is wrong with it.
    pub reason: String,
}

impl ConfigError {
    pub(crate) fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid configuration `{}`: {}", self.field, self.reason)
    }
}

impl std::error::Error for ConfigError {}

/// Errors that can occur when constructing a simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// The configuration failed validation.
    InvalidConfig(ConfigError),
    /// A spring references a node index outside `0..node_count`.
    InvalidSpringReference {
        /// Index of the spring in the spring list.
        spring: usize,
        /// The out-of-range node index.
        node: usize,
        /// Number of nodes in the simulation.
        node_count: usize,
    },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InvalidConfig(e) => write!(f, "{}", e),
            SimulationError::InvalidSpringReference {
                spring,
                node,
                node_count,
            } => write!(
                f,
                "Spring {} references node {} but the simulation only has {} nodes",
                spring, node, node_count
            ),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::InvalidConfig(e) => Some(e),
            SimulationError::InvalidSpringReference { .. } => None,
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(e: ConfigError) -> Self {
        SimulationError::InvalidConfig(e)
    }
}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when running a simulation in a window.
#[derive(Debug)]
pub enum RunError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// Rebuilding the simulation (on reset) failed.
    Simulation(SimulationError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            RunError::Window(e) => write!(f, "Failed to create window: {}", e),
            RunError::Gpu(e) => write!(f, "GPU error: {}", e),
            RunError::Simulation(e) => write!(f, "Simulation error: {}", e),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::EventLoop(e) => Some(e),
            RunError::Window(e) => Some(e),
            RunError::Gpu(e) => Some(e),
            RunError::Simulation(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for RunError {
    fn from(e: winit::error::EventLoopError) -> Self {
        RunError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for RunError {
    fn from(e: winit::error::OsError) -> Self {
        RunError::Window(e)
    }
}

impl From<GpuError> for RunError {
    fn from(e: GpuError) -> Self {
        RunError::Gpu(e)
    }
}

impl From<SimulationError> for RunError {
    fn from(e: SimulationError) -> Self {
        RunError::Simulation(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spring_reference_message() {
        let err = SimulationError::InvalidSpringReference {
            spring: 3,
            node: 70,
            node_count: 64,
        };
        let msg = err.to_string();
        assert!(msg.contains("Spring 3"));
        assert!(msg.contains("node 70"));
        assert!(msg.contains("64 nodes"));
    }

    #[test]
    fn test_config_error_source() {
        use std::error::Error;

        let err: SimulationError = ConfigError::new("drag", "must be in (0, 1)").into();
        assert!(err.source().is_some());
        assert!(err.to_string().contains("`drag`"));
    }
}
