//! Duration-based health-state progression.
//!
//! The progression model is a pure function of (state, entry tick, dwell,
//! now) plus draws from the duration stream.  It never touches population
//! storage — the scheduler applies the returned transition through
//! `Population::apply_transition`, which enforces the graph.

use epi_core::{HealthState, RngStream, Tick};

use crate::{DiseaseError, DiseaseResult, DurationDistribution};

/// Dwell distributions and branch probabilities for the state machine.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressionModel {
    /// Dwell in Exposed before turning Infectious.
    pub exposed_duration: DurationDistribution,
    /// Dwell in Infectious before the recover-vs-die branch.
    pub infectious_duration: DurationDistribution,
    /// Probability that an Infectious agent dies (rather than recovers) when
    /// its dwell expires.  Overridden per-case by the infecting variant's
    /// lethality when variants are enabled.
    pub fatality_prob: f64,
    /// Per-tick probability that a Susceptible agent gains resistance and
    /// moves directly to Recovered (vaccination path).  Zero disables it.
    pub gain_resistance_prob: f64,
}

impl ProgressionModel {
    pub fn validate(&self) -> DiseaseResult<()> {
        self.exposed_duration.validate()?;
        self.infectious_duration.validate()?;
        if !(0.0..=1.0).contains(&self.fatality_prob) {
            return Err(DiseaseError::ProbabilityOutOfRange {
                name: "fatality_prob",
                value: self.fatality_prob,
            });
        }
        if !(0.0..=1.0).contains(&self.gain_resistance_prob) {
            return Err(DiseaseError::ProbabilityOutOfRange {
                name: "gain_resistance_prob",
                value: self.gain_resistance_prob,
            });
        }
        Ok(())
    }

    /// Sample the dwell time for an agent entering `state`.  States without
    /// duration-based progression dwell 0 (the value is never read).
    pub fn dwell_on_entry(&self, state: HealthState, stream: &mut RngStream) -> u32 {
        match state {
            HealthState::Exposed => self.exposed_duration.sample(stream),
            HealthState::Infectious => self.infectious_duration.sample(stream),
            _ => 0,
        }
    }

    /// `true` if an agent that entered `state` at `entered` with dwell
    /// `duration` is due to progress at `now`.
    ///
    /// An agent that entered its state this very tick is never due — a
    /// same-tick exposure cannot progress in the tick it happened.
    pub fn due(&self, state: HealthState, entered: Tick, duration: u32, now: Tick) -> bool {
        if !matches!(state, HealthState::Exposed | HealthState::Infectious) {
            return false;
        }
        entered < now && now.since(entered) >= duration as u64
    }

    /// Resolve the transition for an agent whose dwell expired, returning
    /// the next state and its pre-sampled dwell.
    ///
    /// - Exposed → Infectious (no draw for the edge; one duration-stream
    ///   draw for the new dwell).
    /// - Infectious → Dead with probability `lethality`, else Recovered
    ///   (one duration-stream draw for the branch; terminals dwell 0).
    ///
    /// Returns `None` for states without duration-based progression.
    pub fn progress(
        &self,
        state: HealthState,
        lethality: f64,
        stream: &mut RngStream,
    ) -> Option<(HealthState, u32)> {
        match state {
            HealthState::Exposed => {
                let dwell = self.dwell_on_entry(HealthState::Infectious, stream);
                Some((HealthState::Infectious, dwell))
            }
            HealthState::Infectious => {
                let next = if stream.gen_bool(lethality) {
                    HealthState::Dead
                } else {
                    HealthState::Recovered
                };
                Some((next, 0))
            }
            _ => None,
        }
    }
}
