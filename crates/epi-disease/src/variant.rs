//! Pathogen variants with a mutating genetic code.
//!
//! # Model
//!
//! A variant is a bit-string genome of `genome_bits` bits plus an infection
//! probability and a lethality, both drifted from its parent's values.  On
//! every successful transmission the source's variant may mutate: each
//! genome bit flips independently with `mutation_prob`.  A mutated code that
//! has been seen before *is* that earlier variant (codes are identifying);
//! a novel code becomes a new variant whose probabilities drift from the
//! parent by `(flipped_bits / genome_bits) × parent_value`, with a random
//! sign, clamped to [0, 1].
//!
//! All flips and sign draws come from the mutation stream, keeping the
//! transmission stream at exactly one draw per eligible pair.

use rustc_hash::FxHashMap;

use epi_core::{RngStream, VariantId};

use crate::{DiseaseError, DiseaseResult};

/// One pathogen variant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variant {
    /// Genome bit-string, identifying.
    pub code: u16,
    /// Per-contact infection probability for this variant.
    pub infection_prob: f64,
    /// Probability the recover-vs-die branch resolves to Dead.
    pub death_prob: f64,
}

/// Registry of every variant observed during a run.
///
/// Append-only: variants are registered as mutations produce them and are
/// never removed, so a `VariantId` stays valid for the whole run.
#[derive(Debug)]
pub struct VariantRegistry {
    genome_bits: u8,
    mutation_prob: f64,
    variants: Vec<Variant>,
    by_code: FxHashMap<u16, VariantId>,
}

impl VariantRegistry {
    /// Create a registry seeded with the root variant (all-zero genome,
    /// the configured base probabilities).
    pub fn new(
        genome_bits: u8,
        mutation_prob: f64,
        base_infection_prob: f64,
        base_death_prob: f64,
    ) -> DiseaseResult<Self> {
        if genome_bits == 0 || genome_bits > 16 {
            return Err(DiseaseError::GenomeTooWide(genome_bits));
        }
        if !(0.0..=1.0).contains(&mutation_prob) {
            return Err(DiseaseError::ProbabilityOutOfRange {
                name: "mutation_prob",
                value: mutation_prob,
            });
        }
        let root = Variant {
            code: 0,
            infection_prob: base_infection_prob,
            death_prob: base_death_prob,
        };
        let mut by_code = FxHashMap::default();
        by_code.insert(0, VariantId(0));
        Ok(Self {
            genome_bits,
            mutation_prob,
            variants: vec![root],
            by_code,
        })
    }

    /// The root variant carried by the index cases.
    #[inline]
    pub fn root(&self) -> VariantId {
        VariantId(0)
    }

    #[inline]
    pub fn get(&self, id: VariantId) -> &Variant {
        &self.variants[id.index()]
    }

    /// Number of distinct variants observed so far.
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Iterate `(id, variant)` in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (VariantId, &Variant)> + '_ {
        self.variants
            .iter()
            .enumerate()
            .map(|(i, v)| (VariantId(i as u16), v))
    }

    /// Derive the variant transmitted by a carrier of `parent`.
    ///
    /// Flips each genome bit with `mutation_prob`; returns `parent` itself
    /// when nothing flips.  A flipped code already in the registry resolves
    /// to the existing id — probabilities do not re-drift.
    pub fn mutate(&mut self, parent: VariantId, stream: &mut RngStream) -> VariantId {
        let parent_variant = self.variants[parent.index()].clone();

        let mut code = parent_variant.code;
        let mut flipped = 0u32;
        for bit in 0..self.genome_bits {
            if stream.gen_bool(self.mutation_prob) {
                code ^= 1 << bit;
                flipped += 1;
            }
        }
        if flipped == 0 {
            return parent;
        }
        if let Some(&existing) = self.by_code.get(&code) {
            return existing;
        }

        let fraction = flipped as f64 / self.genome_bits as f64;
        let sign = |s: &mut RngStream| if s.gen_bool(0.5) { 1.0 } else { -1.0 };
        let infection_prob = (parent_variant.infection_prob
            + fraction * parent_variant.infection_prob * sign(stream))
        .clamp(0.0, 1.0);
        let death_prob = (parent_variant.death_prob
            + fraction * parent_variant.death_prob * sign(stream))
        .clamp(0.0, 1.0);

        let id = VariantId(self.variants.len() as u16);
        self.variants.push(Variant { code, infection_prob, death_prob });
        self.by_code.insert(code, id);
        id
    }

    /// Display label: the genome as zero-padded upper-case hex.
    pub fn label(&self, id: VariantId) -> String {
        let width = (self.genome_bits as usize).div_ceil(4);
        format!("{:0width$X}", self.get(id).code)
    }
}
