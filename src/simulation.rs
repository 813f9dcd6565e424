//! Simulation state and the per-frame step.

use glam::Vec2;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{SimConfig, SpringLayout};
use crate::error::SimulationError;
use crate::forces::ForceModel;
use crate::input::PointerState;
use crate::integrator::Integrator;
use crate::spatial::SpatialGrid;

/// Frames between periodic debug reports.
const REPORT_INTERVAL: u64 = 600;

/// A point mass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Node {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl Node {
    /// A node at rest at `position`.
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
        }
    }
}

/// A zero-rest-length spring between two nodes, by index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Spring {
    pub left: usize,
    pub right: usize,
}

impl Spring {
    pub fn new(left: usize, right: usize) -> Self {
        Self { left, right }
    }
}

/// A running spring/repulsion simulation.
///
/// Node and spring counts are fixed for the lifetime of the simulation.
///
/// # Example
///
/// ```
/// use spring_toy::{PointerState, SimConfig, Simulation};
///
/// let mut sim = Simulation::new(SimConfig::default().with_seed(1)).unwrap();
/// for _ in 0..10 {
///     sim.step_frame(PointerState::released());
/// }
/// assert_eq!(sim.frame(), 10);
/// assert_eq!(sim.segments().count(), sim.springs().len());
/// ```
#[derive(Clone, Debug)]
pub struct Simulation {
    config: SimConfig,
    nodes: Vec<Node>,
    springs: Vec<Spring>,
    grid: SpatialGrid,
    forces: ForceModel,
    integrator: Integrator,
    frame: u64,
}

impl Simulation {
    /// Create a simulation with `config.node_count` nodes scattered uniformly
    /// over the area and springs assigned by `config.spring_layout`.
    pub fn new(config: SimConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let nodes = random_nodes(&config, &mut rng);
        let springs = layout_springs(&config, &mut rng);

        Self::with_nodes(config, nodes, springs)
    }

    /// Create a simulation from explicit nodes and springs.
    ///
    /// `config.node_count` and `config.spring_count` are overwritten with the
    /// lengths of `nodes` and `springs`; `config.spring_layout` is ignored.
    /// Fails if any spring references a node outside `nodes`.
    pub fn with_nodes(
        mut config: SimConfig,
        nodes: Vec<Node>,
        springs: Vec<Spring>,
    ) -> Result<Self, SimulationError> {
        config.validate_parameters()?;
        validate_springs(&springs, nodes.len())?;

        config.node_count = nodes.len();
        config.spring_count = springs.len();

        let coverage = config.repel_coverage();
        if config.repel_radius > coverage {
            warn!(
                "repel_radius {} exceeds grid neighborhood {}; repulsion is cut off at the neighborhood edge",
                config.repel_radius, coverage
            );
        }

        let grid = SpatialGrid::new(config.spatial());
        info!(
            "Simulation created: {} nodes, {} springs, {}x{} grid",
            nodes.len(),
            springs.len(),
            config.grid_columns,
            config.grid_rows
        );

        Ok(Self {
            forces: ForceModel::from_config(&config),
            integrator: Integrator::new(config.timestep, config.drag),
            config,
            nodes,
            springs,
            grid,
            frame: 0,
        })
    }

    /// Advance one frame: springs, grid rebuild, per-node forces, integration.
    pub fn step_frame(&mut self, pointer: PointerState) {
        self.forces.apply_springs(&mut self.nodes, &self.springs);

        self.grid.rebuild(self.nodes.iter().map(|n| n.position));

        for node in &mut self.nodes {
            node.velocity += self.forces.node_force(node.position, &self.grid, pointer);
        }

        self.integrator.step(&mut self.nodes);

        self.frame += 1;
        if self.frame % REPORT_INTERVAL == 0 {
            debug!(
                "frame {}: kinetic energy {:.3}, pointer held: {}",
                self.frame,
                self.kinetic_energy(),
                pointer.held
            );
        }
    }

    /// Throw away the current state and build a fresh one from the
    /// configuration. With a seed this restores the initial layout.
    pub fn reset(&mut self) -> Result<(), SimulationError> {
        *self = Self::new(self.config.clone())?;
        Ok(())
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    /// Frames stepped since construction.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Current node positions in node order.
    pub fn positions(&self) -> impl ExactSizeIterator<Item = Vec2> + '_ {
        self.nodes.iter().map(|n| n.position)
    }

    /// Endpoints of every spring, in simulation units.
    pub fn segments(&self) -> impl ExactSizeIterator<Item = (Vec2, Vec2)> + '_ {
        self.springs
            .iter()
            .map(|s| (self.nodes[s.left].position, self.nodes[s.right].position))
    }

    /// Sum of `0.5 * |v|^2` over all nodes (unit mass).
    pub fn kinetic_energy(&self) -> f32 {
        self.nodes
            .iter()
            .map(|n| 0.5 * n.velocity.length_squared())
            .sum()
    }
}

fn validate_springs(springs: &[Spring], node_count: usize) -> Result<(), SimulationError> {
    for (index, spring) in springs.iter().enumerate() {
        for node in [spring.left, spring.right] {
            if node >= node_count {
                return Err(SimulationError::InvalidSpringReference {
                    spring: index,
                    node,
                    node_count,
                });
            }
        }
    }
    Ok(())
}

fn random_nodes(config: &SimConfig, rng: &mut impl Rng) -> Vec<Node> {
    (0..config.node_count)
        .map(|_| {
            Node::at(Vec2::new(
                config.width * rng.gen::<f32>(),
                config.height * rng.gen::<f32>(),
            ))
        })
        .collect()
}

fn layout_springs(config: &SimConfig, rng: &mut impl Rng) -> Vec<Spring> {
    let n = config.node_count;
    (0..config.spring_count)
        .map(|i| match config.spring_layout {
            SpringLayout::Random => Spring::new(rng.gen_range(0..n), rng.gen_range(0..n)),
            SpringLayout::Star => Spring::new(0, i + 1),
            SpringLayout::Chain => Spring::new(i, i + 1),
        })
        .collect()
}
