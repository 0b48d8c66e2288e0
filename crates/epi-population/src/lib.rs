//! `epi-population` — Structure-of-Arrays population storage for the `epi`
//! engine.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                |
//! |-----------|---------------------------------------------------------|
//! | [`store`] | `Population` (SoA arrays), `StateCounts`                |
//! | [`error`] | `PopulationError`, `PopulationResult<T>`                |
//!
//! # Design notes
//!
//! Agents are a flat array indexed by `AgentId`, not individually allocated
//! objects: the spatial index and contact resolution operate on contiguous
//! memory, and relationships (contact pairs, exposures) are index pairs
//! rather than references.  All state mutation goes through
//! [`Population::apply_transition`], which enforces the health-state graph
//! and keeps the aggregate per-state counters exact.

pub mod error;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::{PopulationError, PopulationResult};
pub use store::{Population, StateCounts};
