//! Metrics collection: per-tick snapshots and the optional transition log.

use epi_core::{AgentId, HealthState, Tick, VariantId};
use epi_population::{Population, StateCounts};

// ── TickSnapshot ──────────────────────────────────────────────────────────────

/// The immutable record of one completed tick.
///
/// Snapshots are appended once per tick and never modified afterwards; the
/// series as a whole is the engine's primary output.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickSnapshot {
    pub tick: Tick,
    /// Per-state head counts after the tick's transitions were applied.
    pub counts: StateCounts,
    /// Agents newly Exposed during this tick.
    pub new_exposures: u32,
    /// Active cases per variant, ascending by id.  Empty when variants are
    /// disabled.
    pub variant_counts: Vec<(VariantId, u32)>,
}

// ── TransitionEvent ───────────────────────────────────────────────────────────

/// One health-state change.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionEvent {
    pub agent: AgentId,
    pub from: HealthState,
    pub to: HealthState,
    pub tick: Tick,
}

// ── Run outcome ───────────────────────────────────────────────────────────────

/// Why a run ended.  All of these are normal termination, never errors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunOutcome {
    /// The configured tick limit was reached.
    MaxTicksReached,
    /// No Exposed or Infectious agents remain after an outbreak was active.
    Extinguished,
    /// Active infections reached the configured prevalence threshold.
    PrevalenceReached,
    /// A cooperative stop was requested; the in-flight tick completed first.
    Stopped,
}

/// Summary returned by [`Sim::run`][crate::Sim::run].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Clock position after the final completed tick.
    pub final_tick: Tick,
}

// ── MetricsCollector ──────────────────────────────────────────────────────────

/// Append-only time series of snapshots plus the optional event log.
pub struct MetricsCollector {
    snapshots: Vec<TickSnapshot>,
    events: Vec<TransitionEvent>,
    record_events: bool,
}

impl MetricsCollector {
    pub fn new(record_events: bool) -> Self {
        Self {
            snapshots: Vec::new(),
            events: Vec::new(),
            record_events,
        }
    }

    /// Append the snapshot for `tick`; returns its index in the series.
    pub(crate) fn record(
        &mut self,
        tick: Tick,
        population: &Population,
        new_exposures: u32,
        variant_counts: Vec<(VariantId, u32)>,
    ) -> usize {
        self.snapshots.push(TickSnapshot {
            tick,
            counts: *population.counts(),
            new_exposures,
            variant_counts,
        });
        self.snapshots.len() - 1
    }

    /// Append this tick's transition events (no-op unless event recording
    /// was enabled in the config).
    pub(crate) fn log_events(&mut self, events: &[TransitionEvent]) {
        if self.record_events {
            self.events.extend_from_slice(events);
        }
    }

    /// The full ordered snapshot series.
    pub fn series(&self) -> &[TickSnapshot] {
        &self.snapshots
    }

    /// All recorded transition events, in application order.
    pub fn events(&self) -> &[TransitionEvent] {
        &self.events
    }

    /// The most recent snapshot, if any tick has completed.
    pub fn latest(&self) -> Option<&TickSnapshot> {
        self.snapshots.last()
    }

    /// Number of recorded ticks.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
