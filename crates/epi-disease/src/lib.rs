//! `epi-disease` — the stochastic disease model for the `epi` engine.
//!
//! # Crate layout
//!
//! | Module           | Contents                                              |
//! |------------------|-------------------------------------------------------|
//! | [`duration`]     | `DurationDistribution` — dwell-time sampling          |
//! | [`progression`]  | `ProgressionModel` — duration-based state advancement |
//! | [`transmission`] | `TransmissionModel` — per-pair Bernoulli exposure     |
//! | [`variant`]      | `Variant`, `VariantRegistry` — mutating pathogen      |
//! | [`error`]        | `DiseaseError`, `DiseaseResult<T>`                    |
//!
//! # Determinism contract
//!
//! Every function that draws randomness takes the stream it draws from as an
//! explicit `&mut RngStream` argument — there is no hidden generator.  The
//! transmission model consumes exactly one draw per eligible pair regardless
//! of outcome; dwell sampling and the recover-vs-die branch draw from the
//! duration stream; genome flips draw from the mutation stream.  Keeping the
//! streams separate means the draw count of one concern never perturbs the
//! sequence of another.

pub mod duration;
pub mod error;
pub mod progression;
pub mod transmission;
pub mod variant;

#[cfg(test)]
mod tests;

pub use duration::DurationDistribution;
pub use error::{DiseaseError, DiseaseResult};
pub use progression::ProgressionModel;
pub use transmission::TransmissionModel;
pub use variant::{Variant, VariantRegistry};
