//! `epi-movement` — pluggable movement strategies for grid mode.
//!
//! The scheduler's movement phase calls [`MovementModel::advance`] once per
//! living agent, in ascending id order, drawing from the movement stream.
//! Swapping the model is a compile-time generic on the simulation (no
//! runtime dispatch on the hot path).
//!
//! Network mode has no movement phase — agents are pinned to their nodes.

pub mod model;

#[cfg(test)]
mod tests;

pub use model::{MovementModel, RandomWalk, Stationary};
