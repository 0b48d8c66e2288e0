//! Simulation observer trait for progress reporting and data collection.

use epi_core::Tick;

use crate::{RunReport, TickSnapshot, TransitionEvent};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Everything handed to an observer is an
/// immutable borrow of already-recorded data — observers cannot perturb the
/// run.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, snap: &TickSnapshot) {
///         if tick.0 % self.interval == 0 {
///             println!("{tick}: {} active", snap.counts.active_infections());
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after a tick's transitions were applied, with every state
    /// change that happened during it (exposures, progressions, resistance
    /// gains), in application order.  Fires regardless of whether the
    /// metrics collector is storing events.
    fn on_transitions(&mut self, _tick: Tick, _events: &[TransitionEvent]) {}

    /// Called at the end of each tick with the snapshot just recorded.
    fn on_tick_end(&mut self, _tick: Tick, _snapshot: &TickSnapshot) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _report: &RunReport) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
