//! `epi-sim` — tick-loop scheduler for the epi engine.
//!
//! # The tick loop
//!
//! ```text
//! for each tick:
//!   ① Movement   — advance every living agent (grid mode; movement stream).
//!   ② Rebuild    — reconstruct the spatial grid from new positions and
//!                  verify its structural invariant (grid mode only; the
//!                  network topology is static).
//!   ③ Pairs      — enumerate eligible contact pairs and their policy-scaled
//!                  transmission probabilities.  Pure reads, no RNG — the
//!                  only phase that runs on Rayon under the `parallel`
//!                  feature, partitioned by agent id and merged in index
//!                  order.
//!   ④ Draws      — one Bernoulli draw per eligible pair from the
//!                  transmission stream, in merged order; successes buffer
//!                  exposure events (mutating the source's variant via the
//!                  mutation stream).
//!   ⑤ Exposures  — apply buffered events: still-Susceptible targets become
//!                  Exposed (first success per target wins).  Deferred
//!                  application means an agent exposed mid-tick can never
//!                  transmit within the same tick.
//!   ⑥ Progress   — duration-based transitions in ascending id order
//!                  (Exposed→Infectious, Infectious→Recovered/Dead), then
//!                  per-tick resistance gain for remaining Susceptibles.
//!   ⑦ Metrics    — append the tick's immutable snapshot.
//!   ⑧ Advance    — increment the clock; check termination and stop signal.
//! ```
//!
//! # Stream discipline
//!
//! Each subsystem draws from its own seeded stream (see `epi_core::rng`), in
//! a fixed order within each tick: movement (①), transmission + mutation
//! (④), duration (⑤ dwell on exposure, ⑥ dwell and branch), policy (⑥
//! resistance gain).  The contact stream is consumed only at build time
//! (random-network generation).  Because streams are independent, the draw
//! count of one phase never shifts another's sequence.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs pair enumeration (③) on Rayon's thread pool.      |
//! | `serde`    | Serde derives on config, snapshots, and reports.       |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use epi_movement::RandomWalk;
//! use epi_sim::{NoopObserver, SimBuilder, SimConfig};
//!
//! let mut sim = SimBuilder::new(config, RandomWalk { step: 0.5 }).build()?;
//! let report = sim.run(&mut NoopObserver)?;
//! println!("{:?} after {}", report.outcome, report.final_tick);
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod metrics;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use config::{SimConfig, SpaceConfig, StateFractions, VariantConfig};
pub use error::{SimError, SimResult};
pub use metrics::{MetricsCollector, RunOutcome, RunReport, TickSnapshot, TransitionEvent};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
