//! The `OutputWriter` trait implemented by all backend writers.

use crate::{CompartmentRow, OutputResult, TransitionRow, VariantRow};

/// Trait implemented by CSV, SQLite, and Parquet writers.
///
/// From the observer's perspective all writes are infallible — errors are
/// stored internally and retrieved with [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write one per-tick compartment row.
    fn write_compartments(&mut self, row: &CompartmentRow) -> OutputResult<()>;

    /// Write a batch of transition rows.
    fn write_transitions(&mut self, rows: &[TransitionRow]) -> OutputResult<()>;

    /// Write a batch of variant-frequency rows.
    fn write_variants(&mut self, rows: &[VariantRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
