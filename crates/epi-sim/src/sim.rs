//! The `Sim` struct and its tick loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use epi_core::{AgentId, Bounds, HealthState, NodeId, Point, RngStreams, SimClock, Tick, VariantId};
use epi_disease::{TransmissionModel, VariantRegistry};
use epi_movement::MovementModel;
use epi_policy::{PolicyContext, PolicySchedule};
use epi_population::{Population, StateCounts};
use epi_spatial::{ContactNetwork, SpatialGrid};

use crate::{
    MetricsCollector, RunOutcome, RunReport, SimConfig, SimObserver, SimResult, TickSnapshot,
    TransitionEvent,
};

// ── Contact structure ─────────────────────────────────────────────────────────

/// The run's resolved contact structure.
pub(crate) enum Space {
    Grid {
        grid: SpatialGrid,
        bounds: Bounds,
        contact_radius: f32,
    },
    Network(ContactNetwork),
}

// ── Tick-scoped buffers ───────────────────────────────────────────────────────

/// An eligible contact pair and its policy-scaled transmission probability,
/// produced by the (possibly parallel) pair-enumeration phase.  Holding the
/// probability here keeps that phase free of RNG: all draws happen later,
/// sequentially, in this buffer's order.
#[derive(Copy, Clone, Debug)]
struct PairCandidate {
    source: AgentId,
    target: AgentId,
    prob: f64,
}

/// A successful transmission waiting to be applied after all pairs were
/// evaluated.
#[derive(Copy, Clone, Debug)]
struct Exposure {
    target: AgentId,
    variant: VariantId,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Holds all run state and drives the eight-phase tick loop described in the
/// [crate docs](crate).  Create via [`SimBuilder`][crate::SimBuilder].
///
/// # Query interface
///
/// Everything a renderer or exporter needs is available through read-only
/// accessors ([`state_of`](Self::state_of), [`position_of`](Self::position_of),
/// [`counts`](Self::counts), [`metrics`](Self::metrics)); no mutable access
/// to the population is ever handed out.
pub struct Sim<M: MovementModel> {
    /// The validated run configuration.
    pub config: SimConfig,

    clock: SimClock,
    pub(crate) population: Population,
    streams: RngStreams,
    space: Space,
    movement: M,
    policies: PolicySchedule,
    variants: Option<VariantRegistry>,
    metrics: MetricsCollector,
    stop_flag: Option<Arc<AtomicBool>>,
    /// Whether any Exposed/Infectious agent has ever existed.  Extinction
    /// only terminates a run once an outbreak was actually active — a run
    /// seeded with zero cases runs to its tick limit.
    outbreak_seen: bool,

    // Tick-scoped buffers, reused across ticks to avoid reallocation.
    radii: Vec<f32>,
    candidates: Vec<PairCandidate>,
    exposures: Vec<Exposure>,
    tick_events: Vec<TransitionEvent>,
}

impl<M: MovementModel> Sim<M> {
    pub(crate) fn assemble(
        config: SimConfig,
        population: Population,
        streams: RngStreams,
        space: Space,
        movement: M,
        policies: PolicySchedule,
        variants: Option<VariantRegistry>,
        stop_flag: Option<Arc<AtomicBool>>,
    ) -> Self {
        let outbreak_seen = population.counts().active_infections() > 0;
        let metrics = MetricsCollector::new(config.record_transitions);
        Self {
            config,
            clock: SimClock::new(),
            population,
            streams,
            space,
            movement,
            policies,
            variants,
            metrics,
            stop_flag,
            outbreak_seen,
            radii: Vec::new(),
            candidates: Vec::new(),
            exposures: Vec::new(),
            tick_events: Vec::new(),
        }
    }

    // ── Public stepping interface ─────────────────────────────────────────

    /// Advance exactly one tick and return its snapshot.
    ///
    /// Termination conditions are not consulted here — callers stepping
    /// manually decide for themselves when to stop.
    pub fn step(&mut self) -> SimResult<&TickSnapshot> {
        let now = self.clock.now();
        let idx = self.process_tick(now)?;
        self.clock.advance();
        Ok(&self.metrics.series()[idx])
    }

    /// Run until the tick limit, outbreak extinction, the prevalence
    /// threshold, or a stop request — whichever comes first.  All four are
    /// normal terminations.
    ///
    /// Observer hooks fire at every tick boundary; use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunReport> {
        let outcome = loop {
            if self.clock.now().0 >= self.config.max_ticks {
                break RunOutcome::MaxTicksReached;
            }
            if self.stop_requested() {
                break RunOutcome::Stopped;
            }

            let now = self.clock.now();
            observer.on_tick_start(now);
            let idx = self.process_tick(now)?;
            self.clock.advance();

            observer.on_transitions(now, &self.tick_events);
            let snapshot = &self.metrics.series()[idx];
            observer.on_tick_end(now, snapshot);

            if let Some(outcome) = self.natural_termination(snapshot) {
                break outcome;
            }
        };

        let report = RunReport { outcome, final_tick: self.clock.now() };
        observer.on_sim_end(&report);
        Ok(report)
    }

    // ── Query interface ───────────────────────────────────────────────────

    /// The current tick (the next one to execute).
    pub fn tick(&self) -> Tick {
        self.clock.now()
    }

    /// Read-only view of the whole population.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Current per-state head counts (O(1)).
    pub fn counts(&self) -> &StateCounts {
        self.population.counts()
    }

    /// Current state of one agent.
    pub fn state_of(&self, agent: AgentId) -> HealthState {
        self.population.state_of(agent)
    }

    /// Current position of one agent (grid mode; origin in network mode).
    pub fn position_of(&self, agent: AgentId) -> Point {
        self.population.pos[agent.index()]
    }

    /// The recorded metrics so far.
    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Shorthand for `metrics().series()`.
    pub fn series(&self) -> &[TickSnapshot] {
        self.metrics.series()
    }

    /// The variant registry, when variants are enabled.
    pub fn variants(&self) -> Option<&VariantRegistry> {
        self.variants.as_ref()
    }

    /// Flag or unflag an agent for quarantine-keyed policies.  Call between
    /// ticks only — the policy layer reads the flag mid-tick.
    pub fn set_quarantined(&mut self, agent: AgentId, flag: bool) {
        self.population.set_quarantined(agent, flag);
    }

    // ── Termination ───────────────────────────────────────────────────────

    fn stop_requested(&self) -> bool {
        self.stop_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn natural_termination(&self, snapshot: &TickSnapshot) -> Option<RunOutcome> {
        if self.outbreak_seen && snapshot.counts.active_infections() == 0 {
            return Some(RunOutcome::Extinguished);
        }
        if let Some(threshold) = self.config.halt_prevalence {
            let prevalence =
                snapshot.counts.active_infections() as f64 / self.config.population as f64;
            if prevalence >= threshold {
                return Some(RunOutcome::PrevalenceReached);
            }
        }
        None
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick(&mut self, now: Tick) -> SimResult<usize> {
        self.tick_events.clear();

        // ── Phase 1: movement (grid mode; the Dead stay put) ──────────────
        if let Space::Grid { bounds, .. } = &self.space {
            let bounds = *bounds;
            for i in 0..self.population.count {
                if self.population.state[i] == HealthState::Dead {
                    continue;
                }
                let agent = AgentId(i as u32);
                let next = self.movement.advance(
                    agent,
                    self.population.pos[i],
                    bounds,
                    &mut self.streams.movement,
                );
                self.population.pos[i] = next;
            }
        }

        // ── Phase 2: rebuild the spatial index from new positions ─────────
        //
        // Network topology is static, so only the grid rebuilds.  A failed
        // rebuild (agent outside the world) aborts the tick — the index is
        // never patched up silently.
        if let Space::Grid { grid, .. } = &mut self.space {
            let population = &self.population;
            let remove_dead = self.config.remove_dead;
            grid.rebuild(&population.pos, |a| {
                !(remove_dead && population.state[a.index()] == HealthState::Dead)
            })?;
        }

        // ── Phase 3: enumerate eligible pairs (pure, no RNG) ──────────────
        self.collect_candidates(now);

        // ── Phase 4: transmission draws, one per eligible pair ────────────
        //
        // Draws happen here, sequentially over the merged candidate order,
        // so the transmission stream's sequence is independent of how phase
        // 3 was parallelized.  Every eligible pair costs exactly one draw,
        // even when its target was already claimed by an earlier success.
        self.exposures.clear();
        for idx in 0..self.candidates.len() {
            let c = self.candidates[idx];
            if !self.config.transmission.attempt(c.prob, &mut self.streams.transmission) {
                continue;
            }
            let source_variant = self.population.variant[c.source.index()];
            let variant = match self.variants.as_mut() {
                Some(registry) => registry.mutate(source_variant, &mut self.streams.mutation),
                None => VariantId::INVALID,
            };
            self.exposures.push(Exposure { target: c.target, variant });
        }

        // ── Phase 5: apply exposures (first success per target wins) ──────
        let mut new_exposures = 0u32;
        for idx in 0..self.exposures.len() {
            let e = self.exposures[idx];
            if self.population.state_of(e.target) != HealthState::Susceptible {
                continue;
            }
            let dwell = self
                .config
                .progression
                .dwell_on_entry(HealthState::Exposed, &mut self.streams.duration);
            let from =
                self.population
                    .apply_transition(e.target, HealthState::Exposed, now, dwell)?;
            self.population.variant[e.target.index()] = e.variant;
            self.tick_events.push(TransitionEvent {
                agent: e.target,
                from,
                to: HealthState::Exposed,
                tick: now,
            });
            new_exposures += 1;
        }

        // ── Phase 6: duration-based progression, ascending id ─────────────
        //
        // Agents exposed in phase 5 carry `state_entry_tick == now` and are
        // never due here — a same-tick exposure cannot progress within the
        // tick it happened.
        for i in 0..self.population.count {
            let state = self.population.state[i];
            let due = self.config.progression.due(
                state,
                self.population.state_entry_tick[i],
                self.population.state_duration[i],
                now,
            );
            if !due {
                continue;
            }
            let agent = AgentId(i as u32);
            let lethality = self.case_lethality(agent, state);
            if let Some((next, dwell)) =
                self.config
                    .progression
                    .progress(state, lethality, &mut self.streams.duration)
            {
                let from = self.population.apply_transition(agent, next, now, dwell)?;
                self.tick_events.push(TransitionEvent { agent, from, to: next, tick: now });
            }
        }

        // ── Phase 6b: per-tick resistance gain for remaining Susceptibles ─
        let p_resist = self.config.progression.gain_resistance_prob;
        if p_resist > 0.0 {
            for i in 0..self.population.count {
                if self.population.state[i] != HealthState::Susceptible {
                    continue;
                }
                if !self.streams.policy.gen_bool(p_resist) {
                    continue;
                }
                let agent = AgentId(i as u32);
                let from =
                    self.population
                        .apply_transition(agent, HealthState::Recovered, now, 0)?;
                self.tick_events.push(TransitionEvent {
                    agent,
                    from,
                    to: HealthState::Recovered,
                    tick: now,
                });
            }
        }

        // ── Phase 7: record metrics ───────────────────────────────────────
        let variant_counts = self.variant_counts();
        let idx = self
            .metrics
            .record(now, &self.population, new_exposures, variant_counts);
        self.metrics.log_events(&self.tick_events);
        if self.population.counts().active_infections() > 0 {
            self.outbreak_seen = true;
        }
        Ok(idx)
    }

    /// Probability that this agent's Infectious spell ends in death: the
    /// infecting variant's lethality when variants are enabled, else the
    /// configured case-fatality probability.
    fn case_lethality(&self, agent: AgentId, state: HealthState) -> f64 {
        if state != HealthState::Infectious {
            return self.config.progression.fatality_prob;
        }
        match &self.variants {
            Some(registry) => {
                let v = self.population.variant[agent.index()];
                if v == VariantId::INVALID {
                    self.config.progression.fatality_prob
                } else {
                    registry.get(v).death_prob
                }
            }
            None => self.config.progression.fatality_prob,
        }
    }

    /// Active cases per variant, ascending by id.
    fn variant_counts(&self) -> Vec<(VariantId, u32)> {
        let Some(registry) = &self.variants else {
            return Vec::new();
        };
        let mut counts = vec![0u32; registry.len()];
        for i in 0..self.population.count {
            if !self.population.state[i].is_infected() {
                continue;
            }
            let v = self.population.variant[i];
            if v != VariantId::INVALID {
                counts[v.index()] += 1;
            }
        }
        counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(i, &c)| (VariantId(i as u16), c))
            .collect()
    }

    // ── Pair enumeration ──────────────────────────────────────────────────

    /// Fill `self.candidates` with every eligible unordered pair for this
    /// tick, in ascending (lower id, partner id) order.
    ///
    /// With the `parallel` feature the per-agent scans run on Rayon and are
    /// merged in index order, which yields exactly the sequential ordering.
    fn collect_candidates(&mut self, now: Tick) {
        let Sim {
            population,
            space,
            policies,
            variants,
            config,
            candidates,
            radii,
            ..
        } = self;
        candidates.clear();

        let ctx = PolicyContext {
            tick: now,
            states: &population.state,
            quarantined: &population.quarantined,
        };
        let scan = PairScan {
            states: &population.state,
            variant_ids: &population.variant,
            variants: variants.as_ref(),
            transmission: &config.transmission,
            policies: &*policies,
            ctx,
        };

        match space {
            Space::Network(network) => {
                #[cfg(not(feature = "parallel"))]
                {
                    for i in 0..population.count as u32 {
                        scan.network_pairs(AgentId(i), network, candidates);
                    }
                }

                #[cfg(feature = "parallel")]
                {
                    use rayon::prelude::*;
                    let network = &*network;
                    let per_agent: Vec<Vec<PairCandidate>> = (0..population.count as u32)
                        .into_par_iter()
                        .map(|i| {
                            let mut out = Vec::new();
                            scan.network_pairs(AgentId(i), network, &mut out);
                            out
                        })
                        .collect();
                    for list in per_agent {
                        candidates.extend(list);
                    }
                }
            }

            Space::Grid { grid, contact_radius, .. } => {
                // Policy-scaled radius per agent; a pair is in contact when
                // its distance is within both endpoints' radii.
                radii.clear();
                let base = *contact_radius as f64;
                radii.extend((0..population.count).map(|i| {
                    (base * scan.policies.radius_factor(AgentId(i as u32), &scan.ctx)) as f32
                }));

                #[cfg(not(feature = "parallel"))]
                {
                    for i in 0..population.count as u32 {
                        scan.grid_pairs(AgentId(i), grid, &population.pos, radii, candidates);
                    }
                }

                #[cfg(feature = "parallel")]
                {
                    use rayon::prelude::*;
                    let grid = &*grid;
                    let positions = &population.pos;
                    let radii = &*radii;
                    let per_agent: Vec<Vec<PairCandidate>> = (0..population.count as u32)
                        .into_par_iter()
                        .map(|i| {
                            let mut out = Vec::new();
                            scan.grid_pairs(AgentId(i), grid, positions, radii, &mut out);
                            out
                        })
                        .collect();
                    for list in per_agent {
                        candidates.extend(list);
                    }
                }
            }
        }
    }
}

// ── PairScan ──────────────────────────────────────────────────────────────────

/// Immutable tick state shared by every per-agent pair scan.
///
/// Everything here is a shared borrow, so the scans are freely parallel; the
/// struct draws no randomness.
struct PairScan<'a> {
    states: &'a [HealthState],
    variant_ids: &'a [VariantId],
    variants: Option<&'a VariantRegistry>,
    transmission: &'a TransmissionModel,
    policies: &'a PolicySchedule,
    ctx: PolicyContext<'a>,
}

impl PairScan<'_> {
    /// Pairs for `agent` in network mode: graph neighbours with a greater
    /// id (each unordered edge visited once).
    fn network_pairs(
        &self,
        agent: AgentId,
        network: &ContactNetwork,
        out: &mut Vec<PairCandidate>,
    ) {
        let a_state = self.states[agent.index()];
        for &node in network.neighbors(NodeId(agent.0)) {
            let other = AgentId(node.0);
            if other <= agent {
                continue;
            }
            if !TransmissionModel::eligible(a_state, self.states[other.index()]) {
                continue;
            }
            out.push(self.candidate(agent, a_state, other));
        }
    }

    /// Pairs for `agent` in grid mode: indexed agents with a greater id
    /// within both endpoints' policy-scaled radii.
    fn grid_pairs(
        &self,
        agent: AgentId,
        grid: &SpatialGrid,
        positions: &[Point],
        radii: &[f32],
        out: &mut Vec<PairCandidate>,
    ) {
        let a_state = self.states[agent.index()];
        let center = positions[agent.index()];
        grid.for_each_within(agent, radii[agent.index()], positions, |other| {
            if other <= agent {
                return;
            }
            let rb = radii[other.index()];
            if center.distance_sq(positions[other.index()]) > rb * rb {
                return;
            }
            if !TransmissionModel::eligible(a_state, self.states[other.index()]) {
                return;
            }
            out.push(self.candidate(agent, a_state, other));
        });
    }

    fn candidate(&self, a: AgentId, a_state: HealthState, b: AgentId) -> PairCandidate {
        let (source, target) = TransmissionModel::orient(a, a_state, b);
        let infectivity = match self.variants {
            Some(registry) => {
                let v = self.variant_ids[source.index()];
                if v == VariantId::INVALID {
                    self.transmission.base_infection_prob
                } else {
                    registry.get(v).infection_prob
                }
            }
            None => self.transmission.base_infection_prob,
        };
        let factor = self.policies.transmission_factor(source, target, &self.ctx);
        PairCandidate {
            source,
            target,
            prob: (infectivity * factor).clamp(0.0, 1.0),
        }
    }
}
