//! The `Policy` trait and the built-in interventions.

use epi_core::{AgentId, HealthState, Tick};

// ── PolicyContext ─────────────────────────────────────────────────────────────

/// Read-only view of the agent attributes a policy may key on.
///
/// Built once per tick by the scheduler and shared (immutably) across all
/// policy evaluations, including parallel contact evaluation.
#[derive(Copy, Clone)]
pub struct PolicyContext<'a> {
    /// Current simulation tick.
    pub tick: Tick,
    /// Health state per agent, indexed by `AgentId`.
    pub states: &'a [HealthState],
    /// Quarantine attribute per agent, indexed by `AgentId`.
    pub quarantined: &'a [bool],
}

// ── Policy trait ──────────────────────────────────────────────────────────────

/// A stateless intervention.
///
/// Both hooks default to 1.0 (no effect); implement only the one the
/// intervention acts through.  Returned factors are multiplied across all
/// simultaneously active policies and clamped to [0, 1] by the schedule.
///
/// # Contract
///
/// - Must be pure: same inputs, same factor.  Policies draw no randomness.
/// - Must not block or perform I/O.
/// - Implementations must be `Send + Sync` (shared across Rayon workers
///   during parallel contact evaluation).
pub trait Policy: Send + Sync {
    /// Factor applied to the transmission probability of one contact pair.
    fn transmission_factor(
        &self,
        _source: AgentId,
        _target: AgentId,
        _ctx: &PolicyContext<'_>,
    ) -> f64 {
        1.0
    }

    /// Factor applied to one agent's contact radius (grid mode).
    fn radius_factor(&self, _agent: AgentId, _ctx: &PolicyContext<'_>) -> f64 {
        1.0
    }
}

// ── Built-ins ─────────────────────────────────────────────────────────────────

/// Population-wide masking: every transmission attempt is scaled by a fixed
/// factor.
pub struct Masking {
    pub factor: f64,
}

impl Policy for Masking {
    fn transmission_factor(
        &self,
        _source: AgentId,
        _target: AgentId,
        _ctx: &PolicyContext<'_>,
    ) -> f64 {
        self.factor
    }
}

/// Social distancing: every agent's contact radius is scaled by a fixed
/// factor.  In network mode (no radii) this policy has no effect; express
/// distancing there through `Masking`-style transmission scaling instead.
pub struct Distancing {
    pub factor: f64,
}

impl Policy for Distancing {
    fn radius_factor(&self, _agent: AgentId, _ctx: &PolicyContext<'_>) -> f64 {
        self.factor
    }
}

/// Quarantine: transmission involving a quarantined agent (either side of
/// the pair) is scaled by `factor`.  Which agents carry the quarantine
/// attribute is up to the caller (`Population::set_quarantined`).
pub struct Quarantine {
    pub factor: f64,
}

impl Policy for Quarantine {
    fn transmission_factor(
        &self,
        source: AgentId,
        target: AgentId,
        ctx: &PolicyContext<'_>,
    ) -> f64 {
        if ctx.quarantined[source.index()] || ctx.quarantined[target.index()] {
            self.factor
        } else {
            1.0
        }
    }
}
