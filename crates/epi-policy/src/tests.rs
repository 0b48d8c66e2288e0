//! Unit tests for epi-policy.

use epi_core::{AgentId, HealthState, Tick};

use crate::{Distancing, Masking, Policy, PolicyContext, PolicySchedule, Quarantine};

fn ctx_with<'a>(
    tick: Tick,
    states: &'a [HealthState],
    quarantined: &'a [bool],
) -> PolicyContext<'a> {
    PolicyContext { tick, states, quarantined }
}

#[cfg(test)]
mod policy_tests {
    use super::*;

    const STATES: [HealthState; 2] = [HealthState::Infectious, HealthState::Susceptible];

    #[test]
    fn default_hooks_are_identity() {
        struct Inert;
        impl Policy for Inert {}
        let q = [false, false];
        let ctx = ctx_with(Tick(0), &STATES, &q);
        assert_eq!(Inert.transmission_factor(AgentId(0), AgentId(1), &ctx), 1.0);
        assert_eq!(Inert.radius_factor(AgentId(0), &ctx), 1.0);
    }

    #[test]
    fn masking_scales_transmission_only() {
        let m = Masking { factor: 0.4 };
        let q = [false, false];
        let ctx = ctx_with(Tick(0), &STATES, &q);
        assert_eq!(m.transmission_factor(AgentId(0), AgentId(1), &ctx), 0.4);
        assert_eq!(m.radius_factor(AgentId(0), &ctx), 1.0);
    }

    #[test]
    fn distancing_scales_radius_only() {
        let d = Distancing { factor: 0.5 };
        let q = [false, false];
        let ctx = ctx_with(Tick(0), &STATES, &q);
        assert_eq!(d.radius_factor(AgentId(1), &ctx), 0.5);
        assert_eq!(d.transmission_factor(AgentId(0), AgentId(1), &ctx), 1.0);
    }

    #[test]
    fn quarantine_keys_on_either_side() {
        let q = Quarantine { factor: 0.1 };
        let flags = [true, false];
        let ctx = ctx_with(Tick(0), &STATES, &flags);
        assert_eq!(q.transmission_factor(AgentId(0), AgentId(1), &ctx), 0.1);
        assert_eq!(q.transmission_factor(AgentId(1), AgentId(0), &ctx), 0.1);

        let none = [false, false];
        let ctx = ctx_with(Tick(0), &STATES, &none);
        assert_eq!(q.transmission_factor(AgentId(0), AgentId(1), &ctx), 1.0);
    }
}

#[cfg(test)]
mod schedule_tests {
    use super::*;

    const STATES: [HealthState; 2] = [HealthState::Infectious, HealthState::Susceptible];
    const NO_Q: [bool; 2] = [false, false];

    #[test]
    fn empty_schedule_is_identity() {
        let sched = PolicySchedule::new();
        let ctx = ctx_with(Tick(10), &STATES, &NO_Q);
        assert_eq!(sched.transmission_factor(AgentId(0), AgentId(1), &ctx), 1.0);
        assert_eq!(sched.radius_factor(AgentId(0), &ctx), 1.0);
        assert!(sched.is_empty());
    }

    #[test]
    fn window_boundaries() {
        let sched = PolicySchedule::new().with(
            Box::new(Masking { factor: 0.5 }),
            Tick(30),
            Some(Tick(90)),
        );
        for (tick, expected) in [(29, 1.0), (30, 0.5), (89, 0.5), (90, 1.0)] {
            let ctx = ctx_with(Tick(tick), &STATES, &NO_Q);
            assert_eq!(
                sched.transmission_factor(AgentId(0), AgentId(1), &ctx),
                expected,
                "tick {tick}"
            );
        }
    }

    #[test]
    fn open_ended_window_never_lifts() {
        let sched = PolicySchedule::new().with(Box::new(Masking { factor: 0.5 }), Tick(5), None);
        let ctx = ctx_with(Tick(1_000_000), &STATES, &NO_Q);
        assert_eq!(sched.transmission_factor(AgentId(0), AgentId(1), &ctx), 0.5);
    }

    #[test]
    fn simultaneous_policies_multiply() {
        let sched = PolicySchedule::new()
            .with(Box::new(Masking { factor: 0.5 }), Tick(0), None)
            .with(Box::new(Masking { factor: 0.4 }), Tick(0), None);
        let ctx = ctx_with(Tick(0), &STATES, &NO_Q);
        let f = sched.transmission_factor(AgentId(0), AgentId(1), &ctx);
        assert!((f - 0.2).abs() < 1e-12);
        assert_eq!(sched.active_count(Tick(0)), 2);
    }

    #[test]
    fn combined_factor_clamped() {
        let sched = PolicySchedule::new().with(Box::new(Masking { factor: 3.0 }), Tick(0), None);
        let ctx = ctx_with(Tick(0), &STATES, &NO_Q);
        assert_eq!(sched.transmission_factor(AgentId(0), AgentId(1), &ctx), 1.0);
    }

    #[test]
    fn radius_and_transmission_compose_independently() {
        let sched = PolicySchedule::new()
            .with(Box::new(Distancing { factor: 0.5 }), Tick(0), None)
            .with(Box::new(Masking { factor: 0.25 }), Tick(0), None);
        let ctx = ctx_with(Tick(0), &STATES, &NO_Q);
        assert_eq!(sched.radius_factor(AgentId(0), &ctx), 0.5);
        assert_eq!(sched.transmission_factor(AgentId(0), AgentId(1), &ctx), 0.25);
    }
}
