//! # Spring Toy
//!
//! A real-time 2D force-directed layout: point nodes joined by springs,
//! pushing each other apart at short range, pulled toward the middle of the
//! area, and optionally grabbed with the mouse.
//!
//! ## Quick Start
//!
//! ```ignore
//! use spring_toy::prelude::*;
//!
//! fn main() -> Result<(), RunError> {
//!     let sim = Simulation::new(SimConfig::star().with_seed(42))?;
//!     sim.run()
//! }
//! ```
//!
//! ## Headless use
//!
//! The simulation core has no window dependency at runtime. Drive it with
//! your own frame loop and read back positions for drawing:
//!
//! ```
//! use spring_toy::prelude::*;
//!
//! let mut sim = Simulation::new(SimConfig::default().with_seed(7)).unwrap();
//! let pointer = PointerState::held_at(Vec2::new(360.0, 240.0));
//! sim.step_frame(pointer);
//!
//! // Draw each segment scaled by sim.config().render_scale
//! let longest = sim
//!     .segments()
//!     .map(|(a, b)| (b - a).length())
//!     .fold(0.0, f32::max);
//! assert!(longest.is_finite());
//! ```
//!
//! ## Frame anatomy
//!
//! Every [`Simulation::step_frame`] call runs, in order:
//!
//! 1. Spring forces, once per spring ([`ForceModel::apply_springs`])
//! 2. Spatial grid rebuild from current positions ([`SpatialGrid::rebuild`])
//! 3. Repulsion, centering and pointer forces per node ([`ForceModel::node_force`])
//! 4. Euler integration and drag ([`Integrator::step`])
//!
//! | Parameter | Field | Default |
//! |-----------|-------|---------|
//! | Area | `width`, `height` | 720 x 480 |
//! | Grid | `grid_columns`, `grid_rows`, `neighbor_radius` | 32 x 18, 2 cells |
//! | Repulsion | `repel_radius`, `repel_force` | 45, 3 |
//! | Centering | `centre_force` | 0.03 |
//! | Pointer | `pointer_force` | -10000 |
//! | Integration | `timestep`, `drag` | 0.001, 0.99 |

pub mod config;
pub mod error;
pub mod forces;
pub mod input;
pub mod integrator;
mod shader;
pub mod simulation;
pub mod spatial;
pub mod time;
pub mod vector;
mod window;

pub use config::{SimConfig, SpringLayout};
pub use error::{ConfigError, GpuError, RunError, SimulationError};
pub use forces::ForceModel;
pub use glam::Vec2;
pub use input::{Input, PointerState};
pub use integrator::Integrator;
pub use simulation::{Node, Simulation, Spring};
pub use spatial::{SpatialConfig, SpatialGrid};
pub use vector::Vec2Ext;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use spring_toy::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{SimConfig, SpringLayout};
    pub use crate::error::{RunError, SimulationError};
    pub use crate::input::PointerState;
    pub use crate::simulation::{Node, Simulation, Spring};
    pub use crate::vector::Vec2Ext;
    pub use crate::Vec2;
}
