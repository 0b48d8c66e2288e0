//! Unit tests for epi-disease.

use epi_core::{AgentId, HealthState, RngStream, StreamKind, Tick, VariantId};

use crate::{
    DiseaseError, DurationDistribution, ProgressionModel, TransmissionModel, VariantRegistry,
};

fn duration_stream() -> RngStream {
    RngStream::new(42, StreamKind::Duration)
}

fn model() -> ProgressionModel {
    ProgressionModel {
        exposed_duration: DurationDistribution::Fixed(2),
        infectious_duration: DurationDistribution::Fixed(3),
        fatality_prob: 0.0,
        gain_resistance_prob: 0.0,
    }
}

#[cfg(test)]
mod duration_tests {
    use super::*;

    #[test]
    fn fixed_always_same() {
        let mut s = duration_stream();
        let d = DurationDistribution::Fixed(5);
        for _ in 0..10 {
            assert_eq!(d.sample(&mut s), 5);
        }
    }

    #[test]
    fn uniform_within_bounds() {
        let mut s = duration_stream();
        let d = DurationDistribution::Uniform { min: 2, max: 6 };
        for _ in 0..200 {
            let v = d.sample(&mut s);
            assert!((2..=6).contains(&v));
        }
    }

    #[test]
    fn log_normal_at_least_one_tick() {
        let mut s = duration_stream();
        let d = DurationDistribution::LogNormal { median: 1.2, sigma: 1.5 };
        for _ in 0..500 {
            assert!(d.sample(&mut s) >= 1);
        }
    }

    #[test]
    fn log_normal_centred_on_median() {
        let mut s = duration_stream();
        let d = DurationDistribution::LogNormal { median: 8.0, sigma: 0.3 };
        let n = 2000;
        let mean: f64 = (0..n).map(|_| d.sample(&mut s) as f64).sum::<f64>() / n as f64;
        assert!((6.0..11.0).contains(&mean), "sample mean {mean} far from median 8");
    }

    #[test]
    fn validation_rejects_degenerates() {
        assert!(DurationDistribution::Fixed(0).validate().is_err());
        assert!(DurationDistribution::Uniform { min: 0, max: 3 }.validate().is_err());
        assert!(DurationDistribution::Uniform { min: 4, max: 3 }.validate().is_err());
        assert!(DurationDistribution::LogNormal { median: 0.0, sigma: 1.0 }.validate().is_err());
        assert!(DurationDistribution::LogNormal { median: 2.0, sigma: -0.1 }.validate().is_err());
        assert!(DurationDistribution::Uniform { min: 1, max: 1 }.validate().is_ok());
    }
}

#[cfg(test)]
mod progression_tests {
    use super::*;

    #[test]
    fn due_respects_dwell_and_entry_tick() {
        let m = model();
        let e = HealthState::Exposed;
        assert!(!m.due(e, Tick(5), 2, Tick(5)), "same-tick entry is never due");
        assert!(!m.due(e, Tick(5), 2, Tick(6)));
        assert!(m.due(e, Tick(5), 2, Tick(7)));
        assert!(m.due(e, Tick(5), 2, Tick(9)), "overdue still due");
    }

    #[test]
    fn non_progressing_states_never_due() {
        let m = model();
        for s in [HealthState::Susceptible, HealthState::Recovered, HealthState::Dead] {
            assert!(!m.due(s, Tick(0), 0, Tick(100)));
        }
    }

    #[test]
    fn exposed_becomes_infectious_with_dwell() {
        let m = model();
        let mut s = duration_stream();
        let (next, dwell) = m.progress(HealthState::Exposed, 0.0, &mut s).unwrap();
        assert_eq!(next, HealthState::Infectious);
        assert_eq!(dwell, 3);
    }

    #[test]
    fn infectious_branch_follows_lethality() {
        let m = model();
        let mut s = duration_stream();
        let (next, dwell) = m.progress(HealthState::Infectious, 0.0, &mut s).unwrap();
        assert_eq!((next, dwell), (HealthState::Recovered, 0));
        let (next, _) = m.progress(HealthState::Infectious, 1.0, &mut s).unwrap();
        assert_eq!(next, HealthState::Dead);
    }

    #[test]
    fn terminal_states_do_not_progress() {
        let m = model();
        let mut s = duration_stream();
        assert!(m.progress(HealthState::Recovered, 0.5, &mut s).is_none());
        assert!(m.progress(HealthState::Dead, 0.5, &mut s).is_none());
        assert!(m.progress(HealthState::Susceptible, 0.5, &mut s).is_none());
    }

    #[test]
    fn validation_rejects_bad_probabilities() {
        let mut m = model();
        m.fatality_prob = 1.5;
        assert!(matches!(
            m.validate().unwrap_err(),
            DiseaseError::ProbabilityOutOfRange { name: "fatality_prob", .. }
        ));
        let mut m = model();
        m.gain_resistance_prob = -0.1;
        assert!(m.validate().is_err());
        assert!(model().validate().is_ok());
    }
}

#[cfg(test)]
mod transmission_tests {
    use super::*;
    use HealthState::*;

    #[test]
    fn eligibility_matrix() {
        assert!(TransmissionModel::eligible(Infectious, Susceptible));
        assert!(TransmissionModel::eligible(Susceptible, Infectious));

        assert!(!TransmissionModel::eligible(Susceptible, Susceptible));
        assert!(!TransmissionModel::eligible(Infectious, Infectious));
        assert!(!TransmissionModel::eligible(Infectious, Exposed));
        assert!(!TransmissionModel::eligible(Infectious, Recovered));
        assert!(!TransmissionModel::eligible(Infectious, Dead));
        assert!(!TransmissionModel::eligible(Exposed, Susceptible));
    }

    #[test]
    fn orient_picks_infectious_source() {
        let (src, dst) = TransmissionModel::orient(AgentId(3), Infectious, AgentId(9));
        assert_eq!((src, dst), (AgentId(3), AgentId(9)));
        let (src, dst) = TransmissionModel::orient(AgentId(3), Susceptible, AgentId(9));
        assert_eq!((src, dst), (AgentId(9), AgentId(3)));
    }

    #[test]
    fn attempt_extremes() {
        let tm = TransmissionModel { base_infection_prob: 0.5 };
        let mut s = RngStream::new(1, StreamKind::Transmission);
        for _ in 0..50 {
            assert!(!tm.attempt(0.0, &mut s));
            assert!(tm.attempt(1.0, &mut s));
        }
    }

    #[test]
    fn attempt_always_consumes_one_draw() {
        // Identical streams stay in lockstep when one sees failing draws and
        // the other succeeding ones — attempt() must cost one draw either way.
        let tm = TransmissionModel { base_infection_prob: 0.5 };
        let mut a = RngStream::new(9, StreamKind::Transmission);
        let mut b = RngStream::new(9, StreamKind::Transmission);
        for _ in 0..100 {
            tm.attempt(0.0, &mut a);
            tm.attempt(1.0, &mut b);
        }
        let x: u64 = a.random();
        let y: u64 = b.random();
        assert_eq!(x, y, "streams diverged: attempt() draw count depends on p");
    }

    #[test]
    fn validation() {
        assert!(TransmissionModel { base_infection_prob: 1.1 }.validate().is_err());
        assert!(TransmissionModel { base_infection_prob: 0.3 }.validate().is_ok());
    }
}

#[cfg(test)]
mod variant_tests {
    use super::*;

    fn registry() -> VariantRegistry {
        VariantRegistry::new(8, 0.5, 0.2, 0.05).unwrap()
    }

    fn mutation_stream() -> RngStream {
        RngStream::new(42, StreamKind::Mutation)
    }

    #[test]
    fn root_carries_base_probabilities() {
        let reg = registry();
        assert_eq!(reg.len(), 1);
        let root = reg.get(reg.root());
        assert_eq!(root.code, 0);
        assert_eq!(root.infection_prob, 0.2);
        assert_eq!(root.death_prob, 0.05);
    }

    #[test]
    fn zero_mutation_prob_never_mutates() {
        let mut reg = VariantRegistry::new(8, 0.0, 0.2, 0.05).unwrap();
        let mut s = mutation_stream();
        for _ in 0..100 {
            assert_eq!(reg.mutate(VariantId(0), &mut s), VariantId(0));
        }
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn mutation_registers_new_codes_once() {
        let mut reg = registry();
        let mut s = mutation_stream();
        let mut seen = std::collections::HashMap::new();
        for _ in 0..500 {
            let id = reg.mutate(reg.root(), &mut s);
            let code = reg.get(id).code;
            // The same code must always resolve to the same id.
            let prev = seen.insert(code, id);
            if let Some(prev_id) = prev {
                assert_eq!(prev_id, id);
            }
        }
        // Every id handed out is registered; the registry holds at most the
        // observed codes plus the (possibly never-returned) root.
        assert!(reg.len() >= seen.len());
        assert!(reg.len() <= seen.len() + 1);
        assert!(reg.len() > 1, "p=0.5 over 8 bits must have produced mutants");
    }

    #[test]
    fn drifted_probabilities_stay_in_range() {
        let mut reg = VariantRegistry::new(4, 0.9, 0.95, 0.9).unwrap();
        let mut s = mutation_stream();
        let mut id = reg.root();
        for _ in 0..200 {
            id = reg.mutate(id, &mut s);
        }
        for (_, v) in reg.iter() {
            assert!((0.0..=1.0).contains(&v.infection_prob));
            assert!((0.0..=1.0).contains(&v.death_prob));
        }
    }

    #[test]
    fn drift_bounded_by_parent_fraction() {
        // A single mutation event moves a probability by at most
        // (flipped / bits) × parent ≤ parent, i.e. child ≤ 2 × parent.
        let mut reg = VariantRegistry::new(8, 1.0, 0.1, 0.01).unwrap();
        let mut s = mutation_stream();
        let child = reg.mutate(reg.root(), &mut s);
        assert_ne!(child, reg.root(), "all-bits mutation must produce a new code");
        let v = reg.get(child);
        assert!(v.infection_prob <= 0.2 + 1e-12);
        assert!(v.death_prob <= 0.02 + 1e-12);
    }

    #[test]
    fn label_is_padded_hex() {
        let reg = VariantRegistry::new(8, 0.0, 0.2, 0.05).unwrap();
        assert_eq!(reg.label(reg.root()), "00");
        let reg16 = VariantRegistry::new(16, 0.0, 0.2, 0.05).unwrap();
        assert_eq!(reg16.label(reg16.root()), "0000");
    }

    #[test]
    fn construction_validated() {
        assert!(matches!(
            VariantRegistry::new(17, 0.1, 0.2, 0.05).unwrap_err(),
            DiseaseError::GenomeTooWide(17)
        ));
        assert!(VariantRegistry::new(0, 0.1, 0.2, 0.05).is_err());
        assert!(VariantRegistry::new(8, 1.5, 0.2, 0.05).is_err());
    }
}
