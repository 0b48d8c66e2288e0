//! `PolicySchedule` — tick-windowed policy activation.
//!
//! Policies toggle by tick ("distancing activates at tick 30, lifts at tick
//! 90") and activation is evaluated fresh each tick, so toggling can never
//! retroactively alter metrics already recorded for earlier ticks.

use epi_core::{AgentId, Tick};

use crate::{Policy, PolicyContext};

struct ScheduledPolicy {
    policy: Box<dyn Policy>,
    /// First tick (inclusive) at which the policy is active.
    from: Tick,
    /// Tick (exclusive) at which the policy lifts; `None` = never lifts.
    until: Option<Tick>,
}

impl ScheduledPolicy {
    fn active_at(&self, tick: Tick) -> bool {
        tick >= self.from && self.until.map_or(true, |u| tick < u)
    }
}

/// An ordered set of policies with activation windows.
///
/// Factors from all policies active at a tick multiply together; the
/// combined factor is clamped to [0, 1] so a misconfigured policy can
/// scale an interaction to zero but never amplify it.
#[derive(Default)]
pub struct PolicySchedule {
    entries: Vec<ScheduledPolicy>,
}

impl PolicySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `policy`, active from tick `from` (inclusive) until tick `until`
    /// (exclusive); `None` keeps it active for the rest of the run.
    pub fn add(&mut self, policy: Box<dyn Policy>, from: Tick, until: Option<Tick>) {
        self.entries.push(ScheduledPolicy { policy, from, until });
    }

    /// Builder-style [`add`](Self::add).
    pub fn with(mut self, policy: Box<dyn Policy>, from: Tick, until: Option<Tick>) -> Self {
        self.add(policy, from, until);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of policies active at `tick`.
    pub fn active_count(&self, tick: Tick) -> usize {
        self.entries.iter().filter(|e| e.active_at(tick)).count()
    }

    /// Combined transmission factor for a contact pair, in [0, 1].
    pub fn transmission_factor(
        &self,
        source: AgentId,
        target: AgentId,
        ctx: &PolicyContext<'_>,
    ) -> f64 {
        self.entries
            .iter()
            .filter(|e| e.active_at(ctx.tick))
            .map(|e| e.policy.transmission_factor(source, target, ctx))
            .product::<f64>()
            .clamp(0.0, 1.0)
    }

    /// Combined contact-radius factor for one agent, in [0, 1].
    pub fn radius_factor(&self, agent: AgentId, ctx: &PolicyContext<'_>) -> f64 {
        self.entries
            .iter()
            .filter(|e| e.active_at(ctx.tick))
            .map(|e| e.policy.radius_factor(agent, ctx))
            .product::<f64>()
            .clamp(0.0, 1.0)
    }
}
