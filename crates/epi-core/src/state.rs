//! Epidemiological health states and the fixed transition graph.
//!
//! The graph is:
//!
//! ```text
//! Susceptible ──exposure──▶ Exposed ──dwell──▶ Infectious ──dwell──▶ Recovered
//!      │                                            │
//!      └──────────resistance gain──────────▶ Recovered        └────▶ Dead
//! ```
//!
//! Recovered and Dead are terminal: no outgoing edges.  Any attempted
//! transition not on this graph is an invariant violation, not a modelling
//! choice — `Population::apply_transition` rejects it.

/// The health state of a single agent.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HealthState {
    /// Never infected; can be exposed by contact with an Infectious agent.
    #[default]
    Susceptible,
    /// Infected but not yet contagious.
    Exposed,
    /// Contagious.
    Infectious,
    /// Immune — either recovered from infection or gained resistance while
    /// still susceptible (vaccination path).  Terminal.
    Recovered,
    /// Terminal.
    Dead,
}

impl HealthState {
    /// Number of distinct states.
    pub const COUNT: usize = 5;

    /// All states in index order.
    pub const ALL: [HealthState; Self::COUNT] = [
        HealthState::Susceptible,
        HealthState::Exposed,
        HealthState::Infectious,
        HealthState::Recovered,
        HealthState::Dead,
    ];

    /// Dense index for per-state count arrays.
    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    /// `true` for states with no outgoing transitions.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, HealthState::Recovered | HealthState::Dead)
    }

    /// `true` if an agent in this state carries an infection (active case).
    #[inline]
    pub fn is_infected(self) -> bool {
        matches!(self, HealthState::Exposed | HealthState::Infectious)
    }

    /// `true` if the edge `self → next` exists in the transition graph.
    pub fn can_transition_to(self, next: HealthState) -> bool {
        use HealthState::*;
        matches!(
            (self, next),
            (Susceptible, Exposed)
                | (Susceptible, Recovered)
                | (Exposed, Infectious)
                | (Infectious, Recovered)
                | (Infectious, Dead)
        )
    }

    /// Column label for CSV/Parquet output and display.
    pub fn as_str(self) -> &'static str {
        match self {
            HealthState::Susceptible => "susceptible",
            HealthState::Exposed => "exposed",
            HealthState::Infectious => "infectious",
            HealthState::Recovered => "recovered",
            HealthState::Dead => "dead",
        }
    }
}

impl std::fmt::Display for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
