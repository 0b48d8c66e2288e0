//! Core population storage: `Population` (SoA data) and `StateCounts`.

use epi_core::{AgentId, HealthState, Point, Tick, VariantId};

use crate::{PopulationError, PopulationResult};

// ── StateCounts ───────────────────────────────────────────────────────────────

/// Aggregate number of agents in each health state.
///
/// Maintained incrementally by [`Population::apply_transition`] so metrics
/// reads are O(1) instead of an O(N) scan per tick.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateCounts {
    pub susceptible: u32,
    pub exposed: u32,
    pub infectious: u32,
    pub recovered: u32,
    pub dead: u32,
}

impl StateCounts {
    /// Count for one state.
    pub fn get(&self, state: HealthState) -> u32 {
        match state {
            HealthState::Susceptible => self.susceptible,
            HealthState::Exposed => self.exposed,
            HealthState::Infectious => self.infectious,
            HealthState::Recovered => self.recovered,
            HealthState::Dead => self.dead,
        }
    }

    /// Sum across all states.  Always equals the population size — agents
    /// are never silently dropped, Dead agents included.
    pub fn total(&self) -> u32 {
        self.susceptible + self.exposed + self.infectious + self.recovered + self.dead
    }

    /// Number of active cases (Exposed + Infectious).  Zero means the
    /// outbreak is extinguished.
    pub fn active_infections(&self) -> u32 {
        self.exposed + self.infectious
    }

    fn bump(&mut self, state: HealthState) {
        *self.slot(state) += 1;
    }

    fn drop_one(&mut self, state: HealthState) {
        let slot = self.slot(state);
        debug_assert!(*slot > 0, "counter underflow for {state}");
        *slot -= 1;
    }

    fn slot(&mut self, state: HealthState) -> &mut u32 {
        match state {
            HealthState::Susceptible => &mut self.susceptible,
            HealthState::Exposed => &mut self.exposed,
            HealthState::Infectious => &mut self.infectious,
            HealthState::Recovered => &mut self.recovered,
            HealthState::Dead => &mut self.dead,
        }
    }
}

// ── Population ────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for all agent state.
///
/// Every `Vec` field has exactly `count` elements; the `AgentId` value is the
/// index into all of them:
///
/// ```ignore
/// let s = population.state[agent.index()];  // O(1), cache-friendly
/// ```
///
/// The SoA fields are `pub` for direct indexed access by the engine's hot
/// phases (and for one-time initialization by the builder).  Health-state
/// changes after initialization must go through
/// [`apply_transition`](Self::apply_transition) — writing `state` directly
/// bypasses the transition graph and desynchronizes the counters.
pub struct Population {
    /// Number of agents.  Equals the length of every SoA `Vec`.
    pub count: usize,

    /// Current health state.
    pub state: Vec<HealthState>,

    /// Tick at which the agent entered its current state.
    pub state_entry_tick: Vec<Tick>,

    /// Dwell time in ticks, sampled once at state entry.  Zero for states
    /// without duration-based progression (Susceptible and the terminals).
    pub state_duration: Vec<u32>,

    /// Planar position (grid mode).  Unused in network mode, where agent `i`
    /// occupies contact-network node `i`.
    pub pos: Vec<Point>,

    /// The variant carried by the agent's current or most recent infection;
    /// `VariantId::INVALID` if never infected (or variants disabled).
    pub variant: Vec<VariantId>,

    /// Policy attribute read by quarantine-style policies.  Set from outside
    /// the tick loop via [`set_quarantined`](Self::set_quarantined).
    pub quarantined: Vec<bool>,

    counts: StateCounts,
}

impl Population {
    /// Allocate a population of `count` agents, all Susceptible at the
    /// origin.  The builder overwrites initial states and positions, then
    /// calls [`recount`](Self::recount).
    pub fn new(count: usize) -> Self {
        Self {
            count,
            state: vec![HealthState::Susceptible; count],
            state_entry_tick: vec![Tick::ZERO; count],
            state_duration: vec![0; count],
            pos: vec![Point::ORIGIN; count],
            variant: vec![VariantId::INVALID; count],
            quarantined: vec![false; count],
            counts: StateCounts {
                susceptible: count as u32,
                ..StateCounts::default()
            },
        }
    }

    /// `true` if there are no agents.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    /// Aggregate per-state counts (O(1)).
    #[inline]
    pub fn counts(&self) -> &StateCounts {
        &self.counts
    }

    /// Current state of one agent.
    #[inline]
    pub fn state_of(&self, agent: AgentId) -> HealthState {
        self.state[agent.index()]
    }

    /// Ticks the agent has spent in its current state as of `now`.
    #[inline]
    pub fn ticks_in_state(&self, agent: AgentId, now: Tick) -> u64 {
        now.since(self.state_entry_tick[agent.index()])
    }

    /// Flag or unflag an agent as quarantined.  Must only be called between
    /// ticks — the policy layer reads the flag mid-tick.
    pub fn set_quarantined(&mut self, agent: AgentId, flag: bool) {
        self.quarantined[agent.index()] = flag;
    }

    // ── State mutation ────────────────────────────────────────────────────

    /// The only health-state mutator.
    ///
    /// Validates that `new_state` is reachable from the agent's current
    /// state per the transition graph, stamps `state_entry_tick = tick`,
    /// stores the pre-sampled `duration`, and updates the aggregate
    /// counters.  Returns the state the agent left.
    ///
    /// # Errors
    ///
    /// [`PopulationError::InvalidTransition`] if the edge is not in the
    /// graph — an invariant violation in the caller, fatal to the run.
    pub fn apply_transition(
        &mut self,
        agent: AgentId,
        new_state: HealthState,
        tick: Tick,
        duration: u32,
    ) -> PopulationResult<HealthState> {
        let i = agent.index();
        if i >= self.count {
            return Err(PopulationError::AgentOutOfRange(agent, self.count));
        }

        let old = self.state[i];
        if !old.can_transition_to(new_state) {
            return Err(PopulationError::InvalidTransition {
                agent,
                from: old,
                to: new_state,
            });
        }

        self.state[i] = new_state;
        self.state_entry_tick[i] = tick;
        self.state_duration[i] = duration;
        self.counts.drop_one(old);
        self.counts.bump(new_state);

        Ok(old)
    }

    /// Recompute the aggregate counters from the `state` array.
    ///
    /// Called once by the builder after it writes initial states directly;
    /// everything after initialization keeps the counters exact through
    /// `apply_transition`.
    pub fn recount(&mut self) {
        let mut counts = StateCounts::default();
        for &s in &self.state {
            counts.bump(s);
        }
        self.counts = counts;
    }
}
