//! `epi-spatial` — contact-structure resolution for the `epi` engine.
//!
//! Two interchangeable contact modes:
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`grid`]    | `SpatialGrid` — uniform bucket grid over the planar world, |
//! |             | rebuilt each tick after movement                           |
//! | [`network`] | `ContactNetwork` — static CSR adjacency built from an edge |
//! |             | list or an Erdős–Rényi draw                                |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                         |
//!
//! Both answer the same question — who is in contact with agent A this tick —
//! and both guarantee that the querying agent is never its own contact and
//! that each unordered pair is enumerable exactly once (partner id greater
//! than the querying id).

pub mod error;
pub mod grid;
pub mod network;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use grid::SpatialGrid;
pub use network::ContactNetwork;
