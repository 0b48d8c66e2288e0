//! Pairwise transmission model.
//!
//! # Draw discipline
//!
//! [`TransmissionModel::attempt`] consumes exactly one Bernoulli draw from
//! the transmission stream per call, success or failure, and the scheduler
//! calls it exactly once per eligible pair per tick — including pairs whose
//! target was already exposed earlier in the same tick (the first success
//! wins; later draws still happen).  This keeps the transmission stream's
//! draw sequence a pure function of the contact structure, so runs are
//! reproducible no matter how the contact phase was parallelized or
//! short-circuited.
//!
//! Non-eligible pairs never reach `attempt` and consume no draw.

use epi_core::{AgentId, HealthState, RngStream};

use crate::{DiseaseError, DiseaseResult};

/// Base transmission parameters.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransmissionModel {
    /// Probability that one contact between an Infectious and a Susceptible
    /// agent causes exposure, before policy scaling.  When variants are
    /// enabled the source's variant infectivity replaces this base value.
    pub base_infection_prob: f64,
}

impl TransmissionModel {
    pub fn validate(&self) -> DiseaseResult<()> {
        if !(0.0..=1.0).contains(&self.base_infection_prob) {
            return Err(DiseaseError::ProbabilityOutOfRange {
                name: "base_infection_prob",
                value: self.base_infection_prob,
            });
        }
        Ok(())
    }

    /// `true` if a contact pair in these states can transmit: exactly one
    /// Infectious and one Susceptible agent.  Pairs involving Exposed,
    /// Recovered, or Dead agents — or two of a kind — are never eligible.
    #[inline]
    pub fn eligible(a: HealthState, b: HealthState) -> bool {
        matches!(
            (a, b),
            (HealthState::Infectious, HealthState::Susceptible)
                | (HealthState::Susceptible, HealthState::Infectious)
        )
    }

    /// Orient an eligible pair as `(source, target)`.
    ///
    /// Call only after [`eligible`](Self::eligible) returned `true`.
    #[inline]
    pub fn orient(
        a: AgentId,
        a_state: HealthState,
        b: AgentId,
    ) -> (AgentId, AgentId) {
        if a_state == HealthState::Infectious {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// One Bernoulli draw at probability `p` (already policy-scaled and
    /// clamped by the caller) from the transmission stream.
    #[inline]
    pub fn attempt(&self, p: f64, stream: &mut RngStream) -> bool {
        stream.gen_bool(p)
    }
}
