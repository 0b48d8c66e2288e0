//! Plain data row types written by output backends.

use epi_sim::{TickSnapshot, TransitionEvent};

/// Per-tick compartment counts — one row per completed tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompartmentRow {
    pub tick: u64,
    pub susceptible: u32,
    pub exposed: u32,
    pub infectious: u32,
    pub recovered: u32,
    pub dead: u32,
    pub new_exposures: u32,
}

impl From<&TickSnapshot> for CompartmentRow {
    fn from(snap: &TickSnapshot) -> Self {
        Self {
            tick: snap.tick.0,
            susceptible: snap.counts.susceptible,
            exposed: snap.counts.exposed,
            infectious: snap.counts.infectious,
            recovered: snap.counts.recovered,
            dead: snap.counts.dead,
            new_exposures: snap.new_exposures,
        }
    }
}

/// One health-state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRow {
    pub tick: u64,
    pub agent_id: u32,
    pub from_state: &'static str,
    pub to_state: &'static str,
}

impl From<&TransitionEvent> for TransitionRow {
    fn from(event: &TransitionEvent) -> Self {
        Self {
            tick: event.tick.0,
            agent_id: event.agent.0,
            from_state: event.from.as_str(),
            to_state: event.to.as_str(),
        }
    }
}

/// Active cases for one variant at one tick, with the variant's drifted
/// parameters alongside for downstream plotting.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantRow {
    pub tick: u64,
    /// Genome as zero-padded upper-case hex.
    pub variant: String,
    pub cases: u32,
    pub infection_prob: f64,
    pub death_prob: f64,
}
