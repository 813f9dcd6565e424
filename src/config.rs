//! Simulation configuration.
//!
//! All tunables live in [`SimConfig`]. Values are fixed once a
//! [`Simulation`](crate::Simulation) is constructed.
//!
//! Forward Euler is only stable while `timestep * force` products stay
//! small, so the force constants and the timestep have to be tuned together.
//! [`SimConfig::validate`] checks ranges, not stability.

use glam::Vec2;

use crate::error::ConfigError;
use crate::spatial::SpatialConfig;

/// How spring endpoints are chosen when a simulation is created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpringLayout {
    /// Both endpoints of every spring are drawn uniformly from all nodes.
    /// Self-springs are possible and harmless.
    #[default]
    Random,
    /// Spring `i` joins node `0` to node `i + 1`.
    Star,
    /// Spring `i` joins node `i` to node `i + 1`.
    Chain,
}

/// Every constant the simulation and its window need.
///
/// # Example
///
/// ```
/// use spring_toy::{SimConfig, SpringLayout};
///
/// let config = SimConfig::default()
///     .with_node_count(128)
///     .with_spring_count(96)
///     .with_spring_layout(SpringLayout::Chain)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Width of the simulation area.
    pub width: f32,
    /// Height of the simulation area.
    pub height: f32,
    /// Number of nodes.
    pub node_count: usize,
    /// Number of springs.
    pub spring_count: usize,
    /// How spring endpoints are assigned.
    pub spring_layout: SpringLayout,
    /// Spatial grid columns.
    pub grid_columns: usize,
    /// Spatial grid rows.
    pub grid_rows: usize,
    /// Neighbor search radius in cells.
    pub neighbor_radius: usize,
    /// Distance beyond which nodes no longer repel.
    ///
    /// Only nodes inside the grid neighborhood are considered, so anything
    /// past [`SimConfig::repel_coverage`] is silently ignored.
    pub repel_radius: f32,
    /// Repulsion per unit of overlap inside `repel_radius`.
    pub repel_force: f32,
    /// Pull toward the area center per unit of displacement.
    pub centre_force: f32,
    /// Pointer force constant. Positive pulls nodes toward the pointer,
    /// negative pushes them away.
    pub pointer_force: f32,
    /// Simulated time advanced per frame.
    pub timestep: f32,
    /// Velocity multiplier applied after every frame, in `(0, 1)`.
    pub drag: f32,
    /// Display pixels per simulation unit.
    pub render_scale: f32,
    /// Seed for node placement and random springs. `None` uses entropy.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::spring_toy()
    }
}

impl SimConfig {
    /// Random springs over 64 nodes in a 720x480 area.
    pub fn spring_toy() -> Self {
        let width = 720.0;
        let grid_columns = 32;
        let neighbor_radius = 2;
        Self {
            width,
            height: 480.0,
            node_count: 64,
            spring_count: 64,
            spring_layout: SpringLayout::Random,
            grid_columns,
            grid_rows: 18,
            neighbor_radius,
            repel_radius: width / grid_columns as f32 * neighbor_radius as f32,
            repel_force: 3.0,
            centre_force: 0.03,
            pointer_force: -10_000.0,
            timestep: 0.001,
            drag: 0.99,
            render_scale: 2.0,
            seed: None,
        }
    }

    /// Same constants as [`SimConfig::spring_toy`], with node 0 as a hub
    /// connected to every other node.
    pub fn star() -> Self {
        let base = Self::spring_toy();
        let spring_count = base.node_count - 1;
        base.with_spring_layout(SpringLayout::Star)
            .with_spring_count(spring_count)
    }

    pub fn with_area(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_node_count(mut self, count: usize) -> Self {
        self.node_count = count;
        self
    }

    pub fn with_spring_count(mut self, count: usize) -> Self {
        self.spring_count = count;
        self
    }

    pub fn with_spring_layout(mut self, layout: SpringLayout) -> Self {
        self.spring_layout = layout;
        self
    }

    /// Set grid resolution and the neighbor radius (in cells).
    ///
    /// Keep `repel_radius` within [`SimConfig::repel_coverage`] or distant
    /// pairs stop repelling.
    pub fn with_grid(mut self, columns: usize, rows: usize, neighbor_radius: usize) -> Self {
        self.grid_columns = columns;
        self.grid_rows = rows;
        self.neighbor_radius = neighbor_radius;
        self
    }

    pub fn with_repulsion(mut self, radius: f32, force: f32) -> Self {
        self.repel_radius = radius;
        self.repel_force = force;
        self
    }

    pub fn with_centre_force(mut self, force: f32) -> Self {
        self.centre_force = force;
        self
    }

    pub fn with_pointer_force(mut self, force: f32) -> Self {
        self.pointer_force = force;
        self
    }

    pub fn with_timestep(mut self, timestep: f32) -> Self {
        self.timestep = timestep;
        self
    }

    pub fn with_drag(mut self, drag: f32) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_render_scale(mut self, scale: f32) -> Self {
        self.render_scale = scale;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Center of the simulation area.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }

    /// Spatial grid settings derived from this configuration.
    pub fn spatial(&self) -> SpatialConfig {
        SpatialConfig {
            width: self.width,
            height: self.height,
            columns: self.grid_columns,
            rows: self.grid_rows,
            neighbor_radius: self.neighbor_radius,
        }
    }

    /// Distance the grid neighborhood is guaranteed to reach in every
    /// direction: the shorter cell side times `neighbor_radius`.
    pub fn repel_coverage(&self) -> f32 {
        let cell = self.spatial().cell_size();
        cell.x.min(cell.y) * self.neighbor_radius as f32
    }

    /// Window size in physical pixels.
    pub fn window_size(&self) -> (u32, u32) {
        (
            (self.width * self.render_scale).round() as u32,
            (self.height * self.render_scale).round() as u32,
        )
    }

    /// Check that every value is in range and that the spring layout can be
    /// generated from `node_count` and `spring_count`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_parameters()?;
        self.validate_layout()
    }

    /// Range checks on the physical and grid parameters only.
    pub fn validate_parameters(&self) -> Result<(), ConfigError> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(ConfigError::new("width", "must be finite and positive"));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(ConfigError::new("height", "must be finite and positive"));
        }
        if self.grid_columns == 0 {
            return Err(ConfigError::new("grid_columns", "must be at least 1"));
        }
        if self.grid_rows == 0 {
            return Err(ConfigError::new("grid_rows", "must be at least 1"));
        }
        if self.repel_radius.is_nan() || self.repel_radius < 0.0 {
            return Err(ConfigError::new("repel_radius", "must not be negative"));
        }
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(ConfigError::new("timestep", "must be finite and positive"));
        }
        if !(self.drag > 0.0 && self.drag < 1.0) {
            return Err(ConfigError::new(
                "drag",
                format!("must be in (0, 1), got {}", self.drag),
            ));
        }
        if !(self.render_scale.is_finite() && self.render_scale > 0.0) {
            return Err(ConfigError::new("render_scale", "must be finite and positive"));
        }
        Ok(())
    }

    fn validate_layout(&self) -> Result<(), ConfigError> {
        match self.spring_layout {
            SpringLayout::Random if self.spring_count > 0 && self.node_count == 0 => {
                Err(ConfigError::new("node_count", "random springs need at least one node"))
            }
            SpringLayout::Star | SpringLayout::Chain
                if self.spring_count > 0 && self.spring_count >= self.node_count =>
            {
                Err(ConfigError::new(
                    "spring_count",
                    format!(
                        "{:?} layout needs more nodes than springs ({} springs, {} nodes)",
                        self.spring_layout, self.spring_count, self.node_count
                    ),
                ))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_spring_toy() {
        let config = SimConfig::default();
        assert_eq!(config, SimConfig::spring_toy());
        assert_eq!(config.node_count, 64);
        assert_eq!(config.spring_count, 64);
        assert!((config.repel_radius - 45.0).abs() < 1e-4);
        assert_eq!(config.center(), Vec2::new(360.0, 240.0));
        assert_eq!(config.window_size(), (1440, 960));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_star_preset() {
        let config = SimConfig::star();
        assert_eq!(config.spring_layout, SpringLayout::Star);
        assert_eq!(config.spring_count, config.node_count - 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_repel_coverage() {
        // Default repel radius is exactly two cell widths
        let config = SimConfig::default();
        assert!((config.repel_coverage() - 45.0).abs() < 1e-4);
        assert!(config.repel_radius <= config.repel_coverage());

        // Tall cells: the narrower side bounds coverage
        let tall = config.clone().with_grid(32, 4, 1);
        assert!((tall.repel_coverage() - 22.5).abs() < 1e-4);
        assert!(tall.repel_radius > tall.repel_coverage());
    }

    #[test]
    fn test_validate_rejects_bad_drag() {
        for drag in [0.0, 1.0, 1.5, -0.2, f32::NAN] {
            let err = SimConfig::default().with_drag(drag).validate().unwrap_err();
            assert_eq!(err.field, "drag");
        }
    }

    #[test]
    fn test_validate_rejects_empty_grid() {
        let err = SimConfig::default().with_grid(0, 18, 2).validate().unwrap_err();
        assert_eq!(err.field, "grid_columns");

        let err = SimConfig::default().with_grid(32, 0, 2).validate().unwrap_err();
        assert_eq!(err.field, "grid_rows");
    }

    #[test]
    fn test_validate_rejects_bad_area_and_timestep() {
        let err = SimConfig::default().with_area(0.0, 10.0).validate().unwrap_err();
        assert_eq!(err.field, "width");

        let err = SimConfig::default().with_area(10.0, f32::INFINITY).validate().unwrap_err();
        assert_eq!(err.field, "height");

        let err = SimConfig::default().with_timestep(0.0).validate().unwrap_err();
        assert_eq!(err.field, "timestep");
    }

    #[test]
    fn test_validate_star_needs_enough_nodes() {
        let err = SimConfig::default()
            .with_spring_layout(SpringLayout::Star)
            .with_node_count(4)
            .with_spring_count(4)
            .validate()
            .unwrap_err();
        assert_eq!(err.field, "spring_count");

        assert!(SimConfig::default()
            .with_spring_layout(SpringLayout::Chain)
            .with_node_count(0)
            .with_spring_count(0)
            .validate()
            .is_ok());
    }
}
