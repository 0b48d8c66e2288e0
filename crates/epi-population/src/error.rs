//! Population-subsystem error type.

use thiserror::Error;

use epi_core::{AgentId, HealthState};

/// Errors produced by `epi-population`.
///
/// An invalid transition is always a logic error in the caller (or a policy
/// plugged into the engine), never a transient condition — the scheduler
/// treats it as fatal to the run.
#[derive(Debug, Error)]
pub enum PopulationError {
    #[error("invalid transition for agent {agent}: {from} -> {to}")]
    InvalidTransition {
        agent: AgentId,
        from: HealthState,
        to: HealthState,
    },

    #[error("agent {0} out of range for population of {1}")]
    AgentOutOfRange(AgentId, usize),
}

pub type PopulationResult<T> = Result<T, PopulationError>;
