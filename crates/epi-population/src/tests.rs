//! Unit tests for epi-population.

use epi_core::{AgentId, HealthState, Tick, VariantId};

use crate::{Population, PopulationError};

#[cfg(test)]
mod construction {
    use super::*;

    #[test]
    fn new_population_all_susceptible() {
        let pop = Population::new(10);
        assert_eq!(pop.count, 10);
        assert!(pop.state.iter().all(|&s| s == HealthState::Susceptible));
        assert_eq!(pop.counts().susceptible, 10);
        assert_eq!(pop.counts().total(), 10);
    }

    #[test]
    fn arrays_have_matching_lengths() {
        let pop = Population::new(7);
        assert_eq!(pop.state.len(), 7);
        assert_eq!(pop.state_entry_tick.len(), 7);
        assert_eq!(pop.state_duration.len(), 7);
        assert_eq!(pop.pos.len(), 7);
        assert_eq!(pop.variant.len(), 7);
        assert_eq!(pop.quarantined.len(), 7);
        assert!(pop.variant.iter().all(|&v| v == VariantId::INVALID));
    }

    #[test]
    fn recount_matches_direct_writes() {
        let mut pop = Population::new(5);
        pop.state[0] = HealthState::Infectious;
        pop.state[1] = HealthState::Exposed;
        pop.state[2] = HealthState::Recovered;
        pop.recount();
        assert_eq!(pop.counts().susceptible, 2);
        assert_eq!(pop.counts().exposed, 1);
        assert_eq!(pop.counts().infectious, 1);
        assert_eq!(pop.counts().recovered, 1);
        assert_eq!(pop.counts().total(), 5);
    }
}

#[cfg(test)]
mod transitions {
    use super::*;

    #[test]
    fn exposure_updates_bookkeeping() {
        let mut pop = Population::new(3);
        let old = pop
            .apply_transition(AgentId(1), HealthState::Exposed, Tick(4), 6)
            .unwrap();
        assert_eq!(old, HealthState::Susceptible);
        assert_eq!(pop.state_of(AgentId(1)), HealthState::Exposed);
        assert_eq!(pop.state_entry_tick[1], Tick(4));
        assert_eq!(pop.state_duration[1], 6);
        assert_eq!(pop.counts().susceptible, 2);
        assert_eq!(pop.counts().exposed, 1);
    }

    #[test]
    fn illegal_edge_rejected() {
        let mut pop = Population::new(2);
        let err = pop
            .apply_transition(AgentId(0), HealthState::Infectious, Tick(0), 1)
            .unwrap_err();
        assert!(matches!(
            err,
            PopulationError::InvalidTransition {
                from: HealthState::Susceptible,
                to: HealthState::Infectious,
                ..
            }
        ));
        // Failed transition leaves everything untouched.
        assert_eq!(pop.state_of(AgentId(0)), HealthState::Susceptible);
        assert_eq!(pop.counts().susceptible, 2);
    }

    #[test]
    fn terminal_states_are_final() {
        let mut pop = Population::new(1);
        let a = AgentId(0);
        pop.apply_transition(a, HealthState::Exposed, Tick(0), 1).unwrap();
        pop.apply_transition(a, HealthState::Infectious, Tick(1), 1).unwrap();
        pop.apply_transition(a, HealthState::Recovered, Tick(2), 0).unwrap();
        for next in HealthState::ALL {
            assert!(pop.apply_transition(a, next, Tick(3), 0).is_err());
        }
        assert_eq!(pop.state_of(a), HealthState::Recovered);
    }

    #[test]
    fn resistance_gain_edge_allowed() {
        let mut pop = Population::new(1);
        pop.apply_transition(AgentId(0), HealthState::Recovered, Tick(5), 0)
            .unwrap();
        assert_eq!(pop.counts().recovered, 1);
        assert_eq!(pop.counts().susceptible, 0);
    }

    #[test]
    fn out_of_range_agent_rejected() {
        let mut pop = Population::new(2);
        let err = pop
            .apply_transition(AgentId(2), HealthState::Exposed, Tick(0), 1)
            .unwrap_err();
        assert!(matches!(err, PopulationError::AgentOutOfRange(AgentId(2), 2)));
    }

    #[test]
    fn conservation_through_full_course() {
        let mut pop = Population::new(4);
        pop.apply_transition(AgentId(0), HealthState::Exposed, Tick(0), 2).unwrap();
        pop.apply_transition(AgentId(1), HealthState::Exposed, Tick(0), 2).unwrap();
        pop.apply_transition(AgentId(0), HealthState::Infectious, Tick(2), 3).unwrap();
        pop.apply_transition(AgentId(0), HealthState::Dead, Tick(5), 0).unwrap();
        pop.apply_transition(AgentId(1), HealthState::Infectious, Tick(2), 3).unwrap();
        pop.apply_transition(AgentId(1), HealthState::Recovered, Tick(5), 0).unwrap();
        assert_eq!(pop.counts().total(), 4);
        assert_eq!(pop.counts().dead, 1);
        assert_eq!(pop.counts().recovered, 1);
        assert_eq!(pop.counts().susceptible, 2);
        assert_eq!(pop.counts().active_infections(), 0);
    }

    #[test]
    fn ticks_in_state() {
        let mut pop = Population::new(1);
        pop.apply_transition(AgentId(0), HealthState::Exposed, Tick(3), 5).unwrap();
        assert_eq!(pop.ticks_in_state(AgentId(0), Tick(3)), 0);
        assert_eq!(pop.ticks_in_state(AgentId(0), Tick(8)), 5);
    }
}
