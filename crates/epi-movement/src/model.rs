//! The `MovementModel` trait and built-in strategies.

use epi_core::{AgentId, Bounds, Point, RngStream};

/// Pluggable per-agent movement.
///
/// # Contract
///
/// - The returned position must lie inside `bounds`; the spatial index
///   treats an out-of-world position as a fatal inconsistency rather than
///   repairing it.
/// - All randomness comes from the passed movement stream, and the
///   scheduler calls agents in ascending id order, so a model that draws a
///   fixed number of samples per call keeps runs reproducible.
/// - Implementations must be `Send + Sync + 'static` (the model is shared
///   borrowed state for the whole run).
pub trait MovementModel: Send + Sync + 'static {
    /// Compute the agent's position for this tick from its current one.
    fn advance(
        &self,
        agent: AgentId,
        pos: Point,
        bounds: Bounds,
        stream: &mut RngStream,
    ) -> Point;
}

// ── Stationary ────────────────────────────────────────────────────────────────

/// Agents never move.  Contact structure is then fixed by initial placement,
/// which makes outbreaks depend purely on the transmission parameters —
/// useful as a baseline and in tests.
pub struct Stationary;

impl MovementModel for Stationary {
    #[inline]
    fn advance(
        &self,
        _agent: AgentId,
        pos: Point,
        _bounds: Bounds,
        _stream: &mut RngStream,
    ) -> Point {
        pos
    }
}

// ── RandomWalk ────────────────────────────────────────────────────────────────

/// Fixed-length step in a uniformly random direction each tick, clamped to
/// the world rectangle.
///
/// Consumes exactly one draw per call (the heading), keeping the movement
/// stream's per-tick draw count equal to the number of moving agents.
pub struct RandomWalk {
    /// Step length per tick, in world units.
    pub step: f32,
}

impl MovementModel for RandomWalk {
    fn advance(
        &self,
        _agent: AgentId,
        pos: Point,
        bounds: Bounds,
        stream: &mut RngStream,
    ) -> Point {
        let heading: f32 = stream.gen_range(0.0..std::f32::consts::TAU);
        let next = Point::new(
            pos.x + heading.cos() * self.step,
            pos.y + heading.sin() * self.step,
        );
        bounds.clamp(next)
    }
}
