//! Disease-model error type.

use thiserror::Error;

/// Errors produced by `epi-disease` — all of them configuration defects
/// caught at validation time, before any tick executes.
#[derive(Debug, Error)]
pub enum DiseaseError {
    #[error("invalid duration distribution: {0}")]
    InvalidDistribution(String),

    #[error("probability `{name}` = {value} outside [0, 1]")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("variant genome of {0} bits exceeds the 16-bit code space")]
    GenomeTooWide(u8),
}

pub type DiseaseResult<T> = Result<T, DiseaseError>;
