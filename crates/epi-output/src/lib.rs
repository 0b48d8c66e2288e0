//! `epi-output` — metrics export writers for the epi engine.
//!
//! Three backends are provided behind Cargo features:
//!
//! | Feature   | Backend  | Files created                                             |
//! |-----------|----------|-----------------------------------------------------------|
//! | *(none)*  | CSV      | `compartments.csv`, `transitions.csv`, `variants.csv`     |
//! | `sqlite`  | SQLite   | `output.db`                                               |
//! | `parquet` | Parquet  | `compartments.parquet`, `transitions.parquet`, `variants.parquet` |
//!
//! All backends implement [`OutputWriter`].  Two ways to feed them:
//!
//! - **Streaming**: [`SimOutputObserver`] implements `epi_sim::SimObserver`
//!   and writes compartment and transition rows as the run progresses.
//! - **Projection**: [`export::write_metrics`] and
//!   [`export::write_variant_series`] project an already-recorded series
//!   into rows after the run — pure read-only passes over immutable
//!   snapshots.
//!
//! # Usage
//!
//! ```rust,ignore
//! use epi_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod export;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{CompartmentRow, TransitionRow, VariantRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
