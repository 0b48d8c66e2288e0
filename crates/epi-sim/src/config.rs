//! Simulation configuration and fail-fast validation.
//!
//! Typically constructed by the application (or deserialized from a config
//! file with the `serde` feature) and handed to [`SimBuilder`][crate::SimBuilder],
//! which calls [`SimConfig::validate`] before touching any state.

use epi_disease::{ProgressionModel, TransmissionModel};

use crate::{SimError, SimResult};

// ── StateFractions ────────────────────────────────────────────────────────────

/// Initial health-state distribution as population fractions.
///
/// Must sum to 1 within a small tolerance.  The builder converts fractions
/// to exact head-counts by largest remainder, so a fraction of `0.01` over
/// 100 agents yields exactly one index case, and assigns states in id order
/// (Infectious first, so agent 0 is the index case of a seeded run).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateFractions {
    pub susceptible: f64,
    pub exposed: f64,
    pub infectious: f64,
    pub recovered: f64,
}

impl StateFractions {
    const TOLERANCE: f64 = 1e-6;

    /// Everyone starts Susceptible (no outbreak unless something external
    /// introduces one).
    pub fn all_susceptible() -> Self {
        Self { susceptible: 1.0, exposed: 0.0, infectious: 0.0, recovered: 0.0 }
    }

    /// A fraction `infectious` of the population seeds the outbreak; the
    /// rest are Susceptible.
    pub fn seeded(infectious: f64) -> Self {
        Self {
            susceptible: 1.0 - infectious,
            exposed: 0.0,
            infectious,
            recovered: 0.0,
        }
    }

    pub fn sum(&self) -> f64 {
        self.susceptible + self.exposed + self.infectious + self.recovered
    }

    fn validate(&self) -> SimResult<()> {
        for (name, value) in [
            ("susceptible", self.susceptible),
            ("exposed", self.exposed),
            ("infectious", self.infectious),
            ("recovered", self.recovered),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimError::InvalidConfiguration(format!(
                    "initial fraction `{name}` = {value} outside [0, 1]"
                )));
            }
        }
        if (self.sum() - 1.0).abs() > Self::TOLERANCE {
            return Err(SimError::InvalidConfiguration(format!(
                "initial fractions sum to {}, expected 1",
                self.sum()
            )));
        }
        Ok(())
    }

    /// Exact head-counts for `n` agents by largest remainder, in the order
    /// (infectious, exposed, recovered); Susceptible takes what is left.
    pub(crate) fn quotas(&self, n: usize) -> (usize, usize, usize) {
        let targets = [
            self.infectious * n as f64,
            self.exposed * n as f64,
            self.recovered * n as f64,
        ];
        let mut counts = [0usize; 3];
        let mut remainders = [0.0f64; 3];
        for (i, t) in targets.iter().enumerate() {
            counts[i] = t.floor() as usize;
            remainders[i] = t - t.floor();
        }
        let assigned: usize = counts.iter().sum();
        let seeded_total = self.infectious + self.exposed + self.recovered;
        let target_total = (seeded_total * n as f64).round() as usize;
        let mut leftover = target_total.saturating_sub(assigned).min(n - assigned);

        // Hand leftovers to the largest remainders; ties break by array
        // order (infectious, exposed, recovered) for determinism.
        while leftover > 0 {
            let mut best = 0;
            for i in 1..3 {
                if remainders[i] > remainders[best] {
                    best = i;
                }
            }
            counts[best] += 1;
            remainders[best] = -1.0;
            leftover -= 1;
        }
        (counts[0], counts[1], counts[2])
    }
}

// ── SpaceConfig ───────────────────────────────────────────────────────────────

/// Which contact structure the run uses.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpaceConfig {
    /// Planar world with a uniform-grid index; agents move each tick and
    /// contact anyone within `contact_radius`.
    Grid {
        width: f32,
        height: f32,
        contact_radius: f32,
    },
    /// Static contact graph over exactly N nodes (agent `i` on node `i`),
    /// given as an undirected edge list.
    Network { edges: Vec<(u32, u32)> },
    /// Static Erdős–Rényi graph with the given expected mean degree, drawn
    /// from the contact stream at build time.
    RandomNetwork { mean_degree: f64 },
}

// ── VariantConfig ─────────────────────────────────────────────────────────────

/// Enables pathogen variants with a mutating genome.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariantConfig {
    /// Genome width in bits (1..=16).
    pub genome_bits: u8,
    /// Per-bit flip probability on each successful transmission.
    pub mutation_prob: f64,
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Number of agents, fixed for the whole run.
    pub population: usize,

    /// Initial health-state distribution.
    pub initial: StateFractions,

    /// Contact structure.
    pub space: SpaceConfig,

    /// Transmission parameters.
    pub transmission: TransmissionModel,

    /// Dwell distributions and branch probabilities.
    pub progression: ProgressionModel,

    /// Pathogen variants; `None` runs a single fixed pathogen.
    pub variants: Option<VariantConfig>,

    /// Hard tick limit.  Reaching it is normal termination, not an error.
    pub max_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Record one `TransitionEvent` per state change in the metrics series.
    pub record_transitions: bool,

    /// Exclude Dead agents from spatial/contact queries.  They remain in
    /// the population and in historical metrics either way.
    pub remove_dead: bool,

    /// Stop once active infections reach this fraction of the population.
    pub halt_prevalence: Option<f64>,
}

impl SimConfig {
    /// Check every parameter; called by the builder before any state is
    /// created so a bad config can never leave a partially initialized run.
    pub fn validate(&self) -> SimResult<()> {
        if self.population == 0 {
            return Err(SimError::InvalidConfiguration(
                "population must be positive".into(),
            ));
        }
        self.initial.validate()?;
        self.transmission
            .validate()
            .map_err(|e| SimError::InvalidConfiguration(e.to_string()))?;
        self.progression
            .validate()
            .map_err(|e| SimError::InvalidConfiguration(e.to_string()))?;

        match &self.space {
            SpaceConfig::Grid { width, height, contact_radius } => {
                if !(*width > 0.0) || !(*height > 0.0) || !(*contact_radius > 0.0) {
                    return Err(SimError::InvalidConfiguration(format!(
                        "grid needs positive dimensions and radius, got {width} x {height}, r = {contact_radius}"
                    )));
                }
            }
            SpaceConfig::Network { edges } => {
                let n = self.population as u32;
                for &(a, b) in edges {
                    if a >= n || b >= n {
                        return Err(SimError::InvalidConfiguration(format!(
                            "edge ({a}, {b}) out of range for {n} agents"
                        )));
                    }
                    if a == b {
                        return Err(SimError::InvalidConfiguration(format!(
                            "self-loop edge on node {a}"
                        )));
                    }
                }
            }
            SpaceConfig::RandomNetwork { mean_degree } => {
                if !(0.0..=self.population as f64).contains(mean_degree) {
                    return Err(SimError::InvalidConfiguration(format!(
                        "mean degree {mean_degree} out of range for {} agents",
                        self.population
                    )));
                }
            }
        }

        if let Some(v) = &self.variants {
            if v.genome_bits == 0 || v.genome_bits > 16 {
                return Err(SimError::InvalidConfiguration(format!(
                    "variant genome of {} bits outside 1..=16",
                    v.genome_bits
                )));
            }
            if !(0.0..=1.0).contains(&v.mutation_prob) {
                return Err(SimError::InvalidConfiguration(format!(
                    "mutation probability {} outside [0, 1]",
                    v.mutation_prob
                )));
            }
        }

        if let Some(p) = self.halt_prevalence {
            if !(p > 0.0 && p <= 1.0) {
                return Err(SimError::InvalidConfiguration(format!(
                    "halt prevalence {p} outside (0, 1]"
                )));
            }
        }

        Ok(())
    }
}
