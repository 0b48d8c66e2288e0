//! Deterministic per-subsystem random streams.
//!
//! # Determinism strategy
//!
//! Every stochastic subsystem draws from its own independently seeded
//! `SmallRng`:
//!
//!   seed = master_seed XOR ((stream_index + 1) * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive stream indices uniformly across the seed space.
//! This means:
//!
//! - Subsystems never share RNG state, so one subsystem's draw count cannot
//!   perturb another's sequence.  Adding a movement draw never shifts the
//!   transmission outcomes.
//! - Each stream's internal draw order is fixed by the scheduler (agents in
//!   ascending id order, pairs in merged index order), so a fixed seed gives
//!   a byte-identical run regardless of thread count.
//! - All draws are made from the single-threaded phases of the tick loop;
//!   nothing in the parallel contact phase touches a stream.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── StreamKind ────────────────────────────────────────────────────────────────

/// Identifies which subsystem a random stream belongs to.
///
/// The per-tick draw order is documented on the scheduler; the streams
/// themselves are interchangeable wrappers — the kind only fixes the seed.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum StreamKind {
    /// Movement-model draws (step directions) and uniform initial placement.
    Movement,
    /// Contact-structure sampling (random-graph generation).
    Contact,
    /// One Bernoulli draw per eligible contact pair.
    Transmission,
    /// Dwell-time sampling and the recover-vs-die branch.
    Duration,
    /// Per-bit genome flips when a variant mutates on transmission.
    Mutation,
    /// Policy-layer draws (per-tick resistance gain).
    Policy,
}

impl StreamKind {
    /// All kinds, in seed-index order.
    pub const ALL: [StreamKind; 6] = [
        StreamKind::Movement,
        StreamKind::Contact,
        StreamKind::Transmission,
        StreamKind::Duration,
        StreamKind::Mutation,
        StreamKind::Policy,
    ];

    #[inline]
    fn seed_index(self) -> u64 {
        match self {
            StreamKind::Movement => 0,
            StreamKind::Contact => 1,
            StreamKind::Transmission => 2,
            StreamKind::Duration => 3,
            StreamKind::Mutation => 4,
            StreamKind::Policy => 5,
        }
    }
}

// ── RngStream ─────────────────────────────────────────────────────────────────

/// A deterministic random stream owned by one subsystem.
pub struct RngStream(SmallRng);

impl RngStream {
    /// Seed deterministically from the run's master seed and a stream kind.
    pub fn new(master_seed: u64, kind: StreamKind) -> Self {
        let seed = master_seed ^ (kind.seed_index() + 1).wrapping_mul(MIXING_CONSTANT);
        RngStream(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types
    /// (`stream.inner().sample(...)`, etc.)
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }

    /// Choose a random element from a slice.
    /// Returns `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}

// ── RngStreams ────────────────────────────────────────────────────────────────

/// The full set of subsystem streams for one run, all derived from a single
/// master seed.
///
/// Construct once at simulation build time and thread `&mut` access to each
/// field into the phase that owns it.  Fields are `pub` for the same reason
/// the SoA arrays are: the scheduler split-borrows them independently.
pub struct RngStreams {
    pub movement: RngStream,
    pub contact: RngStream,
    pub transmission: RngStream,
    pub duration: RngStream,
    pub mutation: RngStream,
    pub policy: RngStream,
}

impl RngStreams {
    /// Derive all subsystem streams from `master_seed`.
    pub fn new(master_seed: u64) -> Self {
        Self {
            movement: RngStream::new(master_seed, StreamKind::Movement),
            contact: RngStream::new(master_seed, StreamKind::Contact),
            transmission: RngStream::new(master_seed, StreamKind::Transmission),
            duration: RngStream::new(master_seed, StreamKind::Duration),
            mutation: RngStream::new(master_seed, StreamKind::Mutation),
            policy: RngStream::new(master_seed, StreamKind::Policy),
        }
    }
}
