//! `epi-core` — foundational types for the `epi` epidemic simulation engine.
//!
//! This crate is a dependency of every other `epi-*` crate.  It intentionally
//! has no `epi-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `NodeId`, `CellId`, `VariantId`            |
//! | [`point`]   | `Point`, `Bounds` — the planar world                  |
//! | [`state`]   | `HealthState` and its fixed transition graph          |
//! | [`time`]    | `Tick`, `SimClock`                                    |
//! | [`rng`]     | `RngStream`, `StreamKind`, `RngStreams`               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod ids;
pub mod point;
pub mod rng;
pub mod state;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use ids::{AgentId, CellId, NodeId, VariantId};
pub use point::{Bounds, Point};
pub use rng::{RngStream, RngStreams, StreamKind};
pub use state::HealthState;
pub use time::{SimClock, Tick};
