//! Unit tests for epi-movement.

use epi_core::{AgentId, Bounds, Point, RngStream, StreamKind};

use crate::{MovementModel, RandomWalk, Stationary};

fn movement_stream(seed: u64) -> RngStream {
    RngStream::new(seed, StreamKind::Movement)
}

#[test]
fn stationary_is_identity() {
    let bounds = Bounds::new(10.0, 10.0);
    let mut s = movement_stream(1);
    let pos = Point::new(3.0, 4.0);
    assert_eq!(Stationary.advance(AgentId(0), pos, bounds, &mut s), pos);
}

#[test]
fn random_walk_moves_by_step_length() {
    let bounds = Bounds::new(100.0, 100.0);
    let mut s = movement_stream(2);
    let walk = RandomWalk { step: 1.5 };
    let pos = Point::new(50.0, 50.0);
    for _ in 0..100 {
        let next = walk.advance(AgentId(0), pos, bounds, &mut s);
        let d = pos.distance(next);
        assert!((d - 1.5).abs() < 1e-3, "step length {d}");
    }
}

#[test]
fn random_walk_stays_in_bounds() {
    let bounds = Bounds::new(5.0, 5.0);
    let mut s = movement_stream(3);
    let walk = RandomWalk { step: 2.0 };
    // Start in a corner so clamping is exercised.
    let mut pos = Point::new(0.1, 0.1);
    for _ in 0..500 {
        pos = walk.advance(AgentId(0), pos, bounds, &mut s);
        assert!(bounds.contains(pos), "escaped to {pos}");
    }
}

#[test]
fn random_walk_deterministic_per_seed() {
    let bounds = Bounds::new(20.0, 20.0);
    let walk = RandomWalk { step: 1.0 };
    let mut a = movement_stream(7);
    let mut b = movement_stream(7);
    let mut pa = Point::new(10.0, 10.0);
    let mut pb = pa;
    for _ in 0..50 {
        pa = walk.advance(AgentId(0), pa, bounds, &mut a);
        pb = walk.advance(AgentId(0), pb, bounds, &mut b);
        assert_eq!(pa, pb);
    }
}
