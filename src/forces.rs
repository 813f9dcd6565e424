//! Force model.
//!
//! Forces are added straight into node velocities (unit mass, the timestep
//! is applied later by the integrator). Each frame runs:
//!
//! | Force | Scope | Shape |
//! |-------|-------|-------|
//! | Spring | once per spring | `left - right`, equal and opposite |
//! | Repulsion | per node, per grid neighbor | linear falloff to zero at `repel_radius` |
//! | Centering | per node | linear pull toward the area center |
//! | Pointer | per node, button held | `min(1, 1/d)^2` along the pointer direction |
//!
//! Repulsion reads neighbor positions from the [`SpatialGrid`], which holds
//! copies taken at the start of the frame, so node order does not matter.

use glam::Vec2;

use crate::config::SimConfig;
use crate::input::PointerState;
use crate::simulation::{Node, Spring};
use crate::spatial::SpatialGrid;
use crate::vector::Vec2Ext;

/// Velocity change applied to a spring's `left` node; `right` gets the
/// negation.
///
/// Unit stiffness, zero rest length.
#[inline]
pub fn spring_impulse(left: Vec2, right: Vec2) -> Vec2 {
    right - left
}

/// Repulsion felt by a node offset by `diff` from a neighbor.
///
/// Zero at or beyond `radius`, growing linearly as the distance shrinks.
/// A zero `diff` (a node meeting itself) yields zero.
#[inline]
pub fn repulsion(diff: Vec2, radius: f32, strength: f32) -> Vec2 {
    let magnitude = ((radius - diff.length()) * strength).max(0.0);
    diff.with_magnitude(magnitude)
}

/// Linear pull from `position` toward `center`.
#[inline]
pub fn centering(position: Vec2, center: Vec2, strength: f32) -> Vec2 {
    (center - position) * strength
}

/// Pointer force on a node at `position`.
///
/// Magnitude is `min(1, 1/d)^2 * |strength|`: capped at full strength within
/// one unit of the pointer, falling off with distance but never reaching
/// zero. Positive `strength` pulls toward the pointer.
#[inline]
pub fn pointer(position: Vec2, pointer: Vec2, strength: f32) -> Vec2 {
    let delta = pointer - position;
    let falloff = (1.0 / delta.length()).min(1.0);
    delta.with_magnitude(falloff * falloff) * strength
}

/// Force constants for one simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceModel {
    pub repel_radius: f32,
    pub repel_force: f32,
    pub centre_force: f32,
    pub pointer_force: f32,
    pub center: Vec2,
}

impl ForceModel {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            repel_radius: config.repel_radius,
            repel_force: config.repel_force,
            centre_force: config.centre_force,
            pointer_force: config.pointer_force,
            center: config.center(),
        }
    }

    /// Apply every spring to the velocities of its two nodes.
    ///
    /// Springs sharing a node accumulate in spring order.
    ///
    /// # Panics
    ///
    /// If a spring references a node outside `nodes`. [`Simulation`]
    /// validates springs on construction.
    ///
    /// [`Simulation`]: crate::Simulation
    pub fn apply_springs(&self, nodes: &mut [Node], springs: &[Spring]) {
        for spring in springs {
            let impulse = spring_impulse(nodes[spring.left].position, nodes[spring.right].position);
            nodes[spring.left].velocity += impulse;
            nodes[spring.right].velocity -= impulse;
        }
    }

    /// Sum of repulsion, centering and pointer forces on a node at
    /// `position`. `grid` must have been rebuilt this frame.
    pub fn node_force(&self, position: Vec2, grid: &SpatialGrid, pointer_state: PointerState) -> Vec2 {
        let mut force = Vec2::ZERO;

        if self.repel_radius > 0.0 && self.repel_force != 0.0 {
            for neighbor in grid.neighbors(position) {
                force += repulsion(position - neighbor, self.repel_radius, self.repel_force);
            }
        }

        force += centering(position, self.center, self.centre_force);

        if pointer_state.held {
            force += pointer(position, pointer_state.position, self.pointer_force);
        }

        force
    }
}
