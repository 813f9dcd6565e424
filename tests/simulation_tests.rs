//! End-to-end tests for the simulation core.
//!
//! These drive `Simulation` through its public API the same way the window
//! does, one `step_frame` per frame, and check the physical behavior.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spring_toy::forces::repulsion;
use spring_toy::prelude::*;
use spring_toy::{SpatialConfig, SpatialGrid};

const EPS: f32 = 1e-4;

/// Springs only: no repulsion, centering or pointer.
fn springs_only() -> SimConfig {
    SimConfig::default()
        .with_repulsion(0.0, 0.0)
        .with_centre_force(0.0)
        .with_pointer_force(0.0)
}

// ============================================================================
// Vector Tests
// ============================================================================

#[test]
fn test_normalized_random_vectors_have_unit_length() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..1000 {
        let v = Vec2::new(rng.gen_range(-1e4..1e4), rng.gen_range(-1e4..1e4));
        if v.length() > 1e-3 {
            assert!((v.safe_normalize().length() - 1.0).abs() < EPS, "{v:?}");
        }
    }
    assert_eq!(Vec2::ZERO.safe_normalize(), Vec2::ZERO);
}

// ============================================================================
// Spatial Grid Tests
// ============================================================================

#[test]
fn test_grid_rebuild_idempotent_on_random_positions() {
    let config = SimConfig::default();
    let mut rng = StdRng::seed_from_u64(5);
    let positions: Vec<Vec2> = (0..200)
        .map(|_| Vec2::new(rng.gen_range(0.0..config.width), rng.gen_range(0.0..config.height)))
        .collect();

    let mut grid = SpatialGrid::new(config.spatial());
    let query = |grid: &SpatialGrid| -> Vec<usize> {
        positions.iter().map(|&p| grid.neighbors(p).count()).collect()
    };

    grid.rebuild(positions.iter().copied());
    let first = query(&grid);
    grid.rebuild(positions.iter().copied());
    let second = query(&grid);

    assert_eq!(first, second);
    assert_eq!(grid.len(), positions.len());
}

#[test]
fn test_neighbors_include_self() {
    let config = SimConfig::default();
    let mut rng = StdRng::seed_from_u64(8);
    let positions: Vec<Vec2> = (0..100)
        .map(|_| Vec2::new(rng.gen_range(-100.0..820.0), rng.gen_range(-100.0..580.0)))
        .collect();

    let mut grid = SpatialGrid::new(config.spatial());
    grid.rebuild(positions.iter().copied());

    for &p in &positions {
        assert!(grid.neighbors(p).any(|n| n == p), "{p:?} missing from its own neighborhood");
    }
}

#[test]
fn test_neighbors_cover_repel_radius() {
    // With the default repel radius (cell width * neighbor radius) every pair
    // that can repel along x must be visible to each other
    let config = SimConfig::default();
    let mut grid = SpatialGrid::new(config.spatial());
    let a = Vec2::new(100.0, 100.0);
    let b = a + Vec2::new(config.repel_radius - 0.5, 0.0);
    grid.rebuild([a, b]);

    assert!(grid.neighbors(a).any(|n| n == b));
    assert!(grid.neighbors(b).any(|n| n == a));
}

#[test]
fn test_escaped_node_clamped_into_edge_cell() {
    let spatial = SpatialConfig::default();
    let mut grid = SpatialGrid::new(spatial);
    let escaped = Vec2::new(10_000.0, 240.0);
    grid.rebuild([escaped]);

    let (column, row) = grid.cell_of(escaped);
    assert_eq!(column, spatial.columns - 1);
    assert_eq!(grid.bucket(column, row), &[escaped]);

    // A query just inside the right edge still finds it
    let near_edge = Vec2::new(spatial.width - 1.0, 240.0);
    assert!(grid.neighbors(near_edge).any(|n| n == escaped));
}

// ============================================================================
// Force Tests
// ============================================================================

#[test]
fn test_repulsion_monotonic_inside_radius() {
    let radius = 45.0;
    assert_eq!(repulsion(Vec2::new(radius, 0.0), radius, 3.0).length(), 0.0);

    let mut previous = 0.0;
    for d in [44.5, 40.0, 30.0, 10.0, 1.0, 0.01] {
        let magnitude = repulsion(Vec2::new(0.0, d), radius, 3.0).length();
        assert!(magnitude > previous, "d = {d}");
        previous = magnitude;
    }

    // Coincident positions have no direction to push along
    assert_eq!(repulsion(Vec2::ZERO, radius, 3.0), Vec2::ZERO);
}

// ============================================================================
// Simulation Scenarios
// ============================================================================

#[test]
fn test_single_spring_first_frame() {
    let d = 100.0;
    let config = springs_only();
    let left = Vec2::new(300.0, 240.0);
    let right = left + Vec2::new(d, 0.0);

    let mut sim = Simulation::with_nodes(
        config.clone(),
        vec![Node::at(left), Node::at(right)],
        vec![Spring::new(0, 1)],
    )
    .unwrap();
    sim.step_frame(PointerState::released());

    let nodes = sim.nodes();
    // Each node received an impulse of magnitude d, then one drag step
    assert!((nodes[0].velocity.length() - d * config.drag).abs() < EPS);
    assert!((nodes[1].velocity.length() - d * config.drag).abs() < EPS);
    assert!((nodes[0].velocity + nodes[1].velocity).length() < EPS);

    // Pulled toward each other by d * timestep
    assert!((nodes[0].position.x - (left.x + d * config.timestep)).abs() < EPS);
    assert!((nodes[1].position.x - (right.x - d * config.timestep)).abs() < EPS);
}

#[test]
fn test_drag_shrinks_velocity_without_forces() {
    let config = springs_only();
    let nodes = vec![
        Node {
            position: Vec2::new(100.0, 100.0),
            velocity: Vec2::new(50.0, -20.0),
        },
        Node {
            position: Vec2::new(600.0, 50.0),
            velocity: Vec2::new(-5.0, 80.0),
        },
    ];
    let mut sim = Simulation::with_nodes(config.clone(), nodes, Vec::new()).unwrap();

    let mut previous: Vec<f32> = sim.nodes().iter().map(|n| n.velocity.length()).collect();
    for _ in 0..500 {
        sim.step_frame(PointerState::released());
        for (node, prev) in sim.nodes().iter().zip(previous.iter_mut()) {
            let speed = node.velocity.length();
            assert!(speed < *prev);
            assert!((speed - *prev * config.drag).abs() < EPS * prev.max(1.0));
            *prev = speed;
        }
    }
    assert!(sim.kinetic_energy() < 1.0);
}

#[test]
fn test_node_at_center_stays_put() {
    let config = SimConfig::default().with_pointer_force(0.0);
    let center = config.center();
    let mut sim = Simulation::with_nodes(config, vec![Node::at(center)], Vec::new()).unwrap();

    for _ in 0..100 {
        sim.step_frame(PointerState::released());
        assert_eq!(sim.nodes()[0].velocity, Vec2::ZERO);
        assert_eq!(sim.nodes()[0].position, center);
    }
}

#[test]
fn test_centering_pulls_toward_center() {
    let config = springs_only().with_centre_force(0.03);
    let center = config.center();
    let start = center + Vec2::new(-200.0, 100.0);
    let mut sim = Simulation::with_nodes(config, vec![Node::at(start)], Vec::new()).unwrap();

    for _ in 0..200 {
        sim.step_frame(PointerState::released());
    }
    let node = sim.nodes()[0];
    assert!(node.position.distance(center) < start.distance(center));
}

#[test]
fn test_close_nodes_push_apart() {
    let config = springs_only().with_repulsion(45.0, 3.0);
    let a = Vec2::new(300.0, 200.0);
    let b = Vec2::new(310.0, 200.0);
    let mut sim = Simulation::with_nodes(config, vec![Node::at(a), Node::at(b)], Vec::new()).unwrap();

    sim.step_frame(PointerState::released());
    let nodes = sim.nodes();
    assert!(nodes[0].velocity.x < 0.0);
    assert!(nodes[1].velocity.x > 0.0);
    assert!(nodes[0].position.distance(nodes[1].position) > a.distance(b));
}

#[test]
fn test_pointer_sign_controls_direction() {
    let target = Vec2::new(400.0, 240.0);
    let start = Vec2::new(300.0, 240.0);

    let pull = springs_only().with_pointer_force(10_000.0);
    let mut sim = Simulation::with_nodes(pull, vec![Node::at(start)], Vec::new()).unwrap();
    sim.step_frame(PointerState::held_at(target));
    assert!(sim.nodes()[0].velocity.x > 0.0);

    // Default constant is negative and pushes away
    let push = springs_only().with_pointer_force(SimConfig::default().pointer_force);
    let mut sim = Simulation::with_nodes(push, vec![Node::at(start)], Vec::new()).unwrap();
    sim.step_frame(PointerState::held_at(target));
    assert!(sim.nodes()[0].velocity.x < 0.0);

    // Released pointer has no effect
    let pull = springs_only().with_pointer_force(10_000.0);
    let mut sim = Simulation::with_nodes(pull, vec![Node::at(start)], Vec::new()).unwrap();
    sim.step_frame(PointerState {
        position: target,
        held: false,
    });
    assert_eq!(sim.nodes()[0].velocity, Vec2::ZERO);
}

#[test]
fn test_default_presets_stay_finite() {
    for config in [SimConfig::spring_toy(), SimConfig::star()] {
        let mut sim = Simulation::new(config.with_seed(2024)).unwrap();
        for frame in 0..2000u32 {
            let pointer = if (500..700).contains(&frame) {
                PointerState::held_at(Vec2::new(360.0, 240.0))
            } else {
                PointerState::released()
            };
            sim.step_frame(pointer);
        }
        for node in sim.nodes() {
            assert!(node.position.is_finite(), "{node:?}");
            assert!(node.velocity.is_finite(), "{node:?}");
        }
        assert_eq!(sim.frame(), 2000);
    }
}

#[test]
fn test_out_of_range_spring_rejected() {
    let nodes = vec![Node::at(Vec2::ZERO); 4];
    let err = Simulation::with_nodes(SimConfig::default(), nodes, vec![Spring::new(4, 0)]).unwrap_err();
    assert!(matches!(
        err,
        SimulationError::InvalidSpringReference { spring: 0, node: 4, node_count: 4 }
    ));
}
