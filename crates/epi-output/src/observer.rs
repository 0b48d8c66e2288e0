//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use epi_core::Tick;
use epi_sim::{RunReport, SimObserver, TickSnapshot, TransitionEvent};

use crate::row::{CompartmentRow, TransitionRow};
use crate::writer::OutputWriter;
use crate::OutputError;

/// A [`SimObserver`] that streams compartment and transition rows to any
/// [`OutputWriter`] backend (CSV, SQLite, Parquet, …) as the run progresses.
///
/// Variant rows need the registry, which the running sim still owns — export
/// them after the run with
/// [`export::write_variant_series`][crate::export::write_variant_series].
///
/// Errors from the writer are stored internally because `SimObserver`
/// methods have no return value.  After `sim.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer: W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to keep writing variant rows after the
    /// run, or to inspect files in tests).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_transitions(&mut self, _tick: Tick, events: &[TransitionEvent]) {
        if events.is_empty() {
            return;
        }
        let rows: Vec<TransitionRow> = events.iter().map(TransitionRow::from).collect();
        let result = self.writer.write_transitions(&rows);
        self.store_err(result);
    }

    fn on_tick_end(&mut self, _tick: Tick, snapshot: &TickSnapshot) {
        let row = CompartmentRow::from(snapshot);
        let result = self.writer.write_compartments(&row);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _report: &RunReport) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
