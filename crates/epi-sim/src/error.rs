use thiserror::Error;

use epi_population::PopulationError;
use epi_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum SimError {
    /// Malformed or out-of-range initialization parameters.  Raised by
    /// validation before any tick executes — no partial state is created.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A health-state invariant violation during a tick — fatal to the run.
    #[error("population error: {0}")]
    Population(#[from] PopulationError),

    /// A spatial-index structural failure during a tick — fatal to the run.
    #[error("spatial error: {0}")]
    Spatial(#[from] SpatialError),
}

pub type SimResult<T> = Result<T, SimError>;
