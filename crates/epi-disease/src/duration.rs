//! Dwell-time distributions.
//!
//! A dwell time is sampled once, at state entry, from the distribution
//! configured for the state being entered — never re-drawn while the agent
//! waits.  All samples are whole ticks and at least 1, so an agent can never
//! skip a state within the tick it entered it.

use rand_distr::{Distribution, LogNormal};

use epi_core::RngStream;

use crate::{DiseaseError, DiseaseResult};

/// How long an agent dwells in a state, in ticks.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DurationDistribution {
    /// Every agent dwells exactly `n` ticks.
    Fixed(u32),
    /// Uniform over `min..=max` ticks.
    Uniform { min: u32, max: u32 },
    /// Log-normal with the given median (in ticks) and shape `sigma`,
    /// discretized by rounding to the nearest whole tick.
    LogNormal { median: f64, sigma: f64 },
}

impl DurationDistribution {
    /// Check the parameters; called from config validation so a bad
    /// distribution fails fast before any tick executes.
    pub fn validate(&self) -> DiseaseResult<()> {
        match *self {
            DurationDistribution::Fixed(n) if n == 0 => Err(
                DiseaseError::InvalidDistribution("fixed duration must be >= 1 tick".into()),
            ),
            DurationDistribution::Uniform { min, max } if min == 0 || min > max => {
                Err(DiseaseError::InvalidDistribution(format!(
                    "uniform bounds {min}..={max} need 1 <= min <= max"
                )))
            }
            DurationDistribution::LogNormal { median, sigma }
                if !(median > 0.0) || !(sigma >= 0.0) =>
            {
                Err(DiseaseError::InvalidDistribution(format!(
                    "log-normal needs median > 0 and sigma >= 0, got median {median}, sigma {sigma}"
                )))
            }
            _ => Ok(()),
        }
    }

    /// Draw one dwell time.  Always at least 1 tick.
    pub fn sample(&self, stream: &mut RngStream) -> u32 {
        match *self {
            DurationDistribution::Fixed(n) => n.max(1),
            DurationDistribution::Uniform { min, max } => stream.gen_range(min..=max).max(1),
            DurationDistribution::LogNormal { median, sigma } => {
                // For a log-normal, exp(mu) is the median — parametrizing by
                // median keeps configs in tick units rather than log-space.
                match LogNormal::new(median.ln(), sigma) {
                    Ok(dist) => {
                        let v: f64 = dist.sample(stream.inner());
                        v.round().max(1.0) as u32
                    }
                    // Unreachable after validate(); fall back to the median.
                    Err(_) => median.round().max(1.0) as u32,
                }
            }
        }
    }
}
