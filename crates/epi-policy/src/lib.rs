//! `epi-policy` — intervention policies for the `epi` engine.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`policy`]   | `Policy` trait, `PolicyContext`, built-in policies       |
//! | [`schedule`] | `PolicySchedule` — tick-windowed activation              |
//!
//! # Design notes
//!
//! Policies are stateless multiplicative modifiers: each active policy
//! contributes a factor in [0, 1] to either the transmission probability of
//! a contact pair or an agent's contact radius.  They read agent attributes
//! (health state, quarantine flag) through a borrowed [`PolicyContext`] and
//! never mutate engine state, so the engine's core invariants cannot be
//! violated from a policy — a policy can only ever scale probabilities and
//! radii downward from their configured baselines.

pub mod policy;
pub mod schedule;

#[cfg(test)]
mod tests;

pub use policy::{Distancing, Masking, Policy, PolicyContext, Quarantine};
pub use schedule::PolicySchedule;
