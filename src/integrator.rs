//! Forward Euler integration with multiplicative drag.

use crate::simulation::Node;

/// Advances positions by `velocity * timestep`, then scales velocity by
/// `drag`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Integrator {
    pub timestep: f32,
    pub drag: f32,
}

impl Integrator {
    pub fn new(timestep: f32, drag: f32) -> Self {
        Self { timestep, drag }
    }

    /// Integrate a single node.
    #[inline]
    pub fn integrate(&self, node: &mut Node) {
        node.position += node.velocity * self.timestep;
        node.velocity *= self.drag;
    }

    /// Integrate every node.
    pub fn step(&self, nodes: &mut [Node]) {
        for node in nodes {
            self.integrate(node);
        }
    }
}
