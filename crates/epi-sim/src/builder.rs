//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use epi_core::{Bounds, HealthState, Point, RngStreams};
use epi_disease::VariantRegistry;
use epi_movement::MovementModel;
use epi_policy::PolicySchedule;
use epi_population::Population;
use epi_spatial::{ContactNetwork, SpatialGrid};

use crate::config::SpaceConfig;
use crate::sim::Space;
use crate::{Sim, SimConfig, SimError, SimResult};

/// Fluent builder for [`Sim<M>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — population, contact structure, disease parameters, seed
/// - `M: MovementModel` — the movement strategy (grid mode; use
///   [`Stationary`][epi_movement::Stationary] when agents should not move)
///
/// # Optional inputs
///
/// | Method           | Default                              |
/// |------------------|--------------------------------------|
/// | `.policies(p)`   | empty schedule (no interventions)    |
/// | `.stop_signal(f)`| no cooperative stop                  |
///
/// # Example
///
/// ```rust,ignore
/// let stop = Arc::new(AtomicBool::new(false));
/// let mut sim = SimBuilder::new(config, RandomWalk { step: 0.5 })
///     .policies(schedule)
///     .stop_signal(Arc::clone(&stop))
///     .build()?;
/// let report = sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<M: MovementModel> {
    config: SimConfig,
    movement: M,
    policies: PolicySchedule,
    stop_flag: Option<Arc<AtomicBool>>,
}

impl<M: MovementModel> SimBuilder<M> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, movement: M) -> Self {
        Self {
            config,
            movement,
            policies: PolicySchedule::new(),
            stop_flag: None,
        }
    }

    /// Supply the intervention schedule.
    pub fn policies(mut self, policies: PolicySchedule) -> Self {
        self.policies = policies;
        self
    }

    /// Supply a cooperative stop flag, checked once per tick boundary.
    /// Setting it mid-tick lets the current tick's writes complete before
    /// the run halts with [`RunOutcome::Stopped`][crate::RunOutcome::Stopped].
    pub fn stop_signal(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }

    /// Validate the configuration, initialize population and contact
    /// structure, and return a ready-to-run [`Sim`].
    ///
    /// Fails with [`SimError::InvalidConfiguration`] before creating any
    /// state if a parameter is malformed.
    pub fn build(self) -> SimResult<Sim<M>> {
        self.config.validate()?;
        let n = self.config.population;
        let mut streams = RngStreams::new(self.config.seed);

        // ── Contact structure ─────────────────────────────────────────────
        let space = match &self.config.space {
            SpaceConfig::Grid { width, height, contact_radius } => {
                let bounds = Bounds::new(*width, *height);
                let grid = SpatialGrid::new(bounds, *contact_radius)
                    .map_err(|e| SimError::InvalidConfiguration(e.to_string()))?;
                Space::Grid { grid, bounds, contact_radius: *contact_radius }
            }
            SpaceConfig::Network { edges } => {
                let network = ContactNetwork::from_edges(n, edges)
                    .map_err(|e| SimError::InvalidConfiguration(e.to_string()))?;
                Space::Network(network)
            }
            SpaceConfig::RandomNetwork { mean_degree } => {
                let network = ContactNetwork::erdos_renyi(n, *mean_degree, &mut streams.contact)
                    .map_err(|e| SimError::InvalidConfiguration(e.to_string()))?;
                Space::Network(network)
            }
        };

        // ── Population ────────────────────────────────────────────────────
        //
        // Head-counts come from the configured fractions by largest
        // remainder; states are assigned in id order (Infectious first, so
        // agent 0 is the index case of a seeded run).  Dwell times for
        // agents starting mid-course are sampled exactly as they would be
        // on a live transition.
        let mut population = Population::new(n);
        let (n_infectious, n_exposed, n_recovered) = self.config.initial.quotas(n);
        let mut idx = 0;
        for (state, quota) in [
            (HealthState::Infectious, n_infectious),
            (HealthState::Exposed, n_exposed),
            (HealthState::Recovered, n_recovered),
        ] {
            for _ in 0..quota {
                population.state[idx] = state;
                population.state_duration[idx] =
                    self.config.progression.dwell_on_entry(state, &mut streams.duration);
                idx += 1;
            }
        }
        population.recount();

        // Uniform initial placement (grid mode).  Network mode pins agent i
        // to node i; positions stay at the origin.
        if let Space::Grid { bounds, .. } = &space {
            for i in 0..n {
                population.pos[i] = Point::new(
                    streams.movement.gen_range(0.0..bounds.width),
                    streams.movement.gen_range(0.0..bounds.height),
                );
            }
        }

        // ── Variants ──────────────────────────────────────────────────────
        let variants = match &self.config.variants {
            Some(vc) => {
                let registry = VariantRegistry::new(
                    vc.genome_bits,
                    vc.mutation_prob,
                    self.config.transmission.base_infection_prob,
                    self.config.progression.fatality_prob,
                )
                .map_err(|e| SimError::InvalidConfiguration(e.to_string()))?;
                // Index cases all carry the root variant.
                let root = registry.root();
                for i in 0..n {
                    if population.state[i].is_infected() {
                        population.variant[i] = root;
                    }
                }
                Some(registry)
            }
            None => None,
        };

        Ok(Sim::assemble(
            self.config,
            population,
            streams,
            space,
            self.movement,
            self.policies,
            variants,
            self.stop_flag,
        ))
    }
}
