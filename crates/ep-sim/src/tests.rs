//! Integration tests for ep-sim.

use std::sync::atomic::Ordering;

use ep_agent::{AgentTable, HealthState};
use ep_core::{AgentId, Bounds, EpidemicConfig, Tick};

use crate::{NoopObserver, SimBuilder, SimObserver, StopReason, TickCounts};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Unit world, no patient zero, no random heading/speed changes.
fn quiet_config(pop_size: usize) -> EpidemicConfig {
    EpidemicConfig {
        pop_size,
        patient_zero_tick:     None,
        x_bounds:              [0.0, 1.0],
        y_bounds:              [0.0, 1.0],
        heading_update_chance: 0.0,
        speed_update_chance:   0.0,
        verbose:               false,
        ..EpidemicConfig::default()
    }
}

/// `n` healthy agents at the centre of the unit square that never resolve
/// their infection.
fn centred(n: usize) -> AgentTable {
    let mut t = AgentTable::zeroed(n);
    t.x.fill(0.5);
    t.y.fill(0.5);
    t.recovery_threshold.fill(1e9);
    t
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::SimError;

    #[test]
    fn builds_successfully_with_defaults() {
        let sim = SimBuilder::new(quiet_config(50)).build().unwrap();
        assert_eq!(sim.agents.count, 50);
        assert_eq!(sim.destinations.len(), 50);
        assert_eq!(sim.destinations.slot_count(), 1);
        assert_eq!(sim.current_tick(), Tick::ZERO);
        assert!(sim.tracker.is_empty());
        assert!(!sim.lockdown.is_active());
    }

    #[test]
    fn invalid_config_errors() {
        let err = SimBuilder::new(quiet_config(0)).build().unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn agent_count_mismatch_errors() {
        let err = SimBuilder::new(quiet_config(5))
            .agents(AgentTable::zeroed(3))
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::AgentCountMismatch { expected: 5, got: 3, .. }));
    }

    #[test]
    fn seed_for_missing_agent_errors() {
        let err = SimBuilder::new(quiet_config(5))
            .seed_infection(Tick(1), AgentId(99))
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::AgentNotFound(AgentId(99))));

        let mut sim = SimBuilder::new(quiet_config(5)).build().unwrap();
        assert!(sim.seed_infection(Tick(3), AgentId(5)).is_err());
        assert!(sim.seed_infection(Tick(3), AgentId(4)).is_ok());
    }

    #[test]
    fn patient_zero_infected_at_configured_tick() {
        let config = EpidemicConfig { patient_zero_tick: Some(2), ..quiet_config(10) };
        let mut sim = SimBuilder::new(config).agents(centred(10)).build().unwrap();
        sim.run_ticks(2, &mut NoopObserver).unwrap();
        assert_eq!(sim.agents.state[0], HealthState::Healthy);
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        assert_eq!(sim.agents.state[0], HealthState::Infected);
        assert_eq!(sim.agents.infected_at[0], Tick(2));
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn runs_to_step_limit() {
        let config = EpidemicConfig {
            simulation_steps:     30,
            end_if_no_infections: false,
            ..quiet_config(20)
        };
        let mut sim = SimBuilder::new(config).build().unwrap();
        let summary = sim.run(&mut NoopObserver).unwrap();
        assert_eq!(summary.stop_reason, StopReason::StepLimit);
        assert_eq!(summary.ticks_simulated, 30);
        assert_eq!(sim.tracker.len(), 30);
        assert_eq!(sim.current_tick(), Tick(30));
    }

    #[test]
    fn stops_at_grace_tick_without_infections() {
        let mut sim = SimBuilder::new(quiet_config(20)).build().unwrap();
        let summary = sim.run(&mut NoopObserver).unwrap();
        assert_eq!(summary.stop_reason, StopReason::NoInfections);
        assert_eq!(summary.ticks_simulated, crate::NO_INFECTION_GRACE_TICKS);
        assert_eq!(summary.never_infected, 20);
        assert_eq!(summary.total_infected, 0);
    }

    #[test]
    fn interrupt_before_run_simulates_nothing() {
        struct EndFlag(bool);
        impl SimObserver for EndFlag {
            fn on_sim_end(&mut self, _s: &crate::RunSummary) { self.0 = true; }
        }

        let mut sim = SimBuilder::new(quiet_config(10)).build().unwrap();
        sim.interrupt_handle().store(true, Ordering::Relaxed);
        let mut obs = EndFlag(false);
        let summary = sim.run(&mut obs).unwrap();
        assert_eq!(summary.stop_reason, StopReason::Interrupted);
        assert_eq!(summary.ticks_simulated, 0);
        assert!(obs.0);
    }

    #[test]
    fn interrupt_during_tick_finishes_that_tick() {
        use std::sync::Arc;
        use std::sync::atomic::AtomicBool;

        // Raises the flag from inside tick 4, the way a signal handler would.
        struct RaiseAt { flag: Arc<AtomicBool>, at: Tick, ended: bool }
        impl SimObserver for RaiseAt {
            fn on_tick_start(&mut self, t: Tick) {
                if t == self.at {
                    self.flag.store(true, Ordering::Relaxed);
                }
            }
            fn on_sim_end(&mut self, _s: &crate::RunSummary) { self.ended = true; }
        }

        let config = EpidemicConfig {
            simulation_steps:     1_000,
            end_if_no_infections: false,
            ..quiet_config(10)
        };
        let mut sim = SimBuilder::new(config).build().unwrap();
        let mut obs = RaiseAt { flag: sim.interrupt_handle(), at: Tick(4), ended: false };
        let summary = sim.run(&mut obs).unwrap();
        assert_eq!(summary.stop_reason, StopReason::Interrupted);
        assert_eq!(summary.ticks_simulated, 5);
        assert_eq!(sim.tracker.len(), 5);
        assert!(obs.ended);
    }

    #[test]
    fn run_ticks_advances_clock() {
        let mut sim = SimBuilder::new(quiet_config(10)).build().unwrap();
        sim.run_ticks(5, &mut NoopObserver).unwrap();
        assert_eq!(sim.current_tick(), Tick(5));
        sim.run_ticks(3, &mut NoopObserver).unwrap();
        assert_eq!(sim.current_tick(), Tick(8));
        assert_eq!(sim.tracker.len(), 8);
    }

    #[test]
    fn observer_called_correct_number_of_times() {
        #[derive(Default)]
        struct Counter { starts: u64, ends: u64, snapshots: u64 }
        impl SimObserver for Counter {
            fn on_tick_start(&mut self, _t: Tick) { self.starts += 1; }
            fn on_tick_end(&mut self, _t: Tick, _c: &TickCounts) { self.ends += 1; }
            fn on_snapshot(&mut self, _t: Tick, _a: &AgentTable) { self.snapshots += 1; }
        }

        let config = EpidemicConfig { output_interval_ticks: 4, ..quiet_config(10) };
        let mut sim = SimBuilder::new(config).build().unwrap();
        let mut obs = Counter::default();
        sim.run_ticks(10, &mut obs).unwrap();
        assert_eq!(obs.starts, 10);
        assert_eq!(obs.ends, 10);
        // Ticks 0, 4, 8.
        assert_eq!(obs.snapshots, 3);
    }

    #[test]
    fn same_seed_same_run() {
        let config = EpidemicConfig {
            patient_zero_tick: Some(0),
            infection_range:   0.05,
            infection_chance:  0.2,
            recovery_duration: (10, 30),
            ..EpidemicConfig::default()
        };
        let config = EpidemicConfig { pop_size: 300, verbose: false, ..config };
        let mut a = SimBuilder::new(config.clone()).build().unwrap();
        let mut b = SimBuilder::new(config).build().unwrap();
        a.run_ticks(120, &mut NoopObserver).unwrap();
        b.run_ticks(120, &mut NoopObserver).unwrap();
        assert_eq!(a.agents.x, b.agents.x);
        assert_eq!(a.agents.state, b.agents.state);
        assert_eq!(a.tracker.infectious, b.tracker.infectious);
    }
}

// ── Disease course ────────────────────────────────────────────────────────────

#[cfg(test)]
mod course_tests {
    use super::*;

    #[test]
    fn single_seed_resolves_exactly_once() {
        let config = EpidemicConfig {
            infection_range:   0.0,
            infection_chance:  1.0,
            recovery_duration: (5, 5),
            ..quiet_config(50)
        };
        let mut sim = SimBuilder::new(config)
            .seed_infection(Tick(10), AgentId(0))
            .build()
            .unwrap();
        sim.agents.recovery_threshold[0] = 0.5;

        sim.run_ticks(15, &mut NoopObserver).unwrap();
        assert_eq!(sim.agents.state[0], HealthState::Infected);
        assert_eq!(sim.agents.infected_at[0], Tick(10));

        sim.run_ticks(1, &mut NoopObserver).unwrap();
        assert!(matches!(sim.agents.state[0], HealthState::Immune | HealthState::Deceased));
        assert!(!sim.agents.in_treatment[0]);

        let infected_ticks: Vec<usize> = sim
            .tracker
            .infectious
            .iter()
            .enumerate()
            .filter(|&(_, &n)| n > 0)
            .map(|(t, _)| t)
            .collect();
        assert_eq!(infected_ticks, vec![10, 11, 12, 13, 14]);
        assert!(sim.tracker.infectious.iter().all(|&n| n <= 1));
        assert_eq!(sim.agents.count_in(HealthState::Healthy), 49);
    }

    #[test]
    fn seeded_agent_admitted_when_capacity_allows() {
        let config = EpidemicConfig { healthcare_capacity: 1, ..quiet_config(3) };
        let mut sim = SimBuilder::new(config)
            .agents(centred(3))
            .seed_infection(Tick(0), AgentId(0))
            .seed_infection(Tick(0), AgentId(1))
            .build()
            .unwrap();
        sim.config.infection_chance = 0.0;
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        assert!(sim.agents.in_treatment[0]);
        assert!(!sim.agents.in_treatment[1]);
        assert_eq!(sim.agents.state[1], HealthState::Infected);
    }

    #[test]
    fn zero_chance_never_spreads() {
        let config = EpidemicConfig {
            pop_size:          200,
            patient_zero_tick: Some(0),
            infection_chance:  0.0,
            infection_range:   0.2,
            verbose:           false,
            ..EpidemicConfig::default()
        };
        let mut sim = SimBuilder::new(config).build().unwrap();
        sim.run_ticks(100, &mut NoopObserver).unwrap();
        assert!(sim.tracker.infectious.iter().all(|&n| n <= 1));
        assert_eq!(sim.agents.count_in(HealthState::Healthy), 199);
    }

    #[test]
    fn population_conserved_and_transitions_monotone() {
        struct Audit { prev: Vec<HealthState>, pop: usize, last_deaths: usize }
        impl SimObserver for Audit {
            fn on_tick_end(&mut self, _t: Tick, c: &TickCounts) {
                assert_eq!(c.susceptible + c.infectious + c.recovered + c.fatalities, self.pop);
                assert!(c.fatalities >= self.last_deaths);
                self.last_deaths = c.fatalities;
            }
            fn on_snapshot(&mut self, t: Tick, agents: &AgentTable) {
                for (i, (&before, &after)) in self.prev.iter().zip(&agents.state).enumerate() {
                    assert!(before.can_transition_to(after), "agent {i} at {t}: {before} → {after}");
                }
                self.prev = agents.state.clone();
            }
        }

        let config = EpidemicConfig {
            pop_size:              300,
            patient_zero_tick:     Some(0),
            infection_range:       0.05,
            infection_chance:      0.3,
            recovery_duration:     (20, 40),
            output_interval_ticks: 1,
            verbose:               false,
            ..EpidemicConfig::default()
        }
        .with_self_isolation(0.5, [0.02, 0.02, 0.1, 0.98], false);
        let mut sim = SimBuilder::new(config).build().unwrap();
        let mut audit = Audit { prev: vec![HealthState::Healthy; 300], pop: 300, last_deaths: 0 };
        sim.run_ticks(300, &mut audit).unwrap();

        let total = sim.agents.count_in(HealthState::Healthy)
            + sim.agents.count_in(HealthState::Infected)
            + sim.agents.count_in(HealthState::Immune)
            + sim.agents.count_in(HealthState::Deceased);
        assert_eq!(total, 300);
        // Immune agents never keep a destination.
        for i in 0..300 {
            if sim.agents.state[i] == HealthState::Immune {
                assert_eq!(sim.agents.active_destination[i], ep_agent::NO_DESTINATION);
            }
        }
    }

    #[test]
    fn new_infections_reported_to_observer() {
        #[derive(Default)]
        struct Infections(Vec<(Tick, AgentId)>);
        impl SimObserver for Infections {
            fn on_new_infections(&mut self, t: Tick, ids: &[AgentId]) {
                self.0.extend(ids.iter().map(|&a| (t, a)));
            }
        }

        let config = EpidemicConfig {
            infection_range:  0.05,
            infection_chance: 1.0,
            ..quiet_config(3)
        };
        let mut table = centred(3);
        table.state[0] = HealthState::Infected;
        table.x[2] = 0.9;
        let mut sim = SimBuilder::new(config).agents(table).build().unwrap();
        let mut obs = Infections::default();
        sim.run_ticks(1, &mut obs).unwrap();
        assert_eq!(obs.0, vec![(Tick(0), AgentId(1))]);
    }
}

// ── Movement & policies ───────────────────────────────────────────────────────

#[cfg(test)]
mod policy_tests {
    use super::*;
    use crate::SimError;

    #[test]
    fn agent_at_wall_turns_back() {
        let mut table = centred(1);
        table.x[0] = 0.999;
        table.heading_x[0] = 1.0;
        table.speed[0] = 0.01;
        let mut sim = SimBuilder::new(quiet_config(1)).agents(table).build().unwrap();
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        assert!(sim.agents.heading_x[0] <= -0.05 && sim.agents.heading_x[0] >= -1.0);
        assert!(sim.agents.x[0] < 0.999);
    }

    #[test]
    fn lockdown_with_full_compliance_stops_everyone() {
        let config = quiet_config(100).with_lockdown(0.1, 1.0);
        let mut table = centred(100);
        table.speed.fill(0.01);
        for i in 0..10 {
            table.state[i] = HealthState::Infected;
        }
        let mut sim = SimBuilder::new(config).agents(table).build().unwrap();
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        assert!(sim.lockdown.is_active());
        assert!(sim.agents.speed.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn lockdown_without_compliance_caps_speed() {
        let config = quiet_config(100).with_lockdown(0.1, 0.0);
        let ceiling = config.lockdown_speed_ceiling;
        let mut table = centred(100);
        table.speed.fill(0.01);
        for i in 0..10 {
            table.state[i] = HealthState::Infected;
        }
        let mut sim = SimBuilder::new(config).agents(table).build().unwrap();
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        assert!(sim.lockdown.is_active());
        assert!(sim.agents.speed.iter().all(|&s| s <= ceiling));
    }

    #[test]
    fn lockdown_below_threshold_stays_off() {
        let config = quiet_config(100).with_lockdown(0.1, 1.0);
        let mut table = centred(100);
        table.state[0] = HealthState::Infected;
        table.x[0] = 0.1;
        let mut sim = SimBuilder::new(config).agents(table).build().unwrap();
        sim.run_ticks(3, &mut NoopObserver).unwrap();
        assert!(!sim.lockdown.is_active());
    }

    #[test]
    fn infected_agent_routed_to_isolation() {
        let config = EpidemicConfig {
            infection_range:  0.05,
            infection_chance: 1.0,
            ..quiet_config(2)
        }
        .with_self_isolation(1.0, [0.02, 0.02, 0.1, 0.98], false);
        let mut table = centred(2);
        table.state[0] = HealthState::Infected;
        let mut sim = SimBuilder::new(config).agents(table).build().unwrap();
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        assert_eq!(sim.agents.state[1], HealthState::Infected);
        assert!(sim.agents.in_treatment[1]);
        assert_eq!(sim.agents.active_destination[1], ep_disease::ISOLATION_SLOT);
        assert!(!sim.agents.arrived[1]);
    }

    #[test]
    fn routing_to_missing_slot_errors() {
        let mut sim = SimBuilder::new(quiet_config(4)).build().unwrap();
        let ward = Bounds::new(0.0, 0.0, 0.2, 0.2);
        let err = sim.route_agent(AgentId(0), 2, &ward).unwrap_err();
        assert!(matches!(err, SimError::Mobility(_)));
        assert!(matches!(
            sim.route_agent(AgentId(9), 1, &ward).unwrap_err(),
            SimError::AgentNotFound(_)
        ));
        sim.route_agent(AgentId(0), 1, &ward).unwrap();
        assert_eq!(sim.agents.active_destination[0], 1);
    }

    #[test]
    fn confined_population_stays_near_box() {
        let mut sim = SimBuilder::new(quiet_config(50))
            .destination_slots(2)
            .build()
            .unwrap();
        let area = Bounds::new(0.4, 0.4, 0.6, 0.6);
        sim.confine(2, &area, true).unwrap();
        assert!(sim.agents.arrived.iter().all(|&a| a));
        sim.run_ticks(50, &mut NoopObserver).unwrap();
        for i in 0..50 {
            assert!(sim.agents.x[i] > 0.3 && sim.agents.x[i] < 0.7, "agent {i}");
            assert!(sim.agents.y[i] > 0.3 && sim.agents.y[i] < 0.7, "agent {i}");
        }

        sim.release(&[]);
        assert!(!sim.agents.any_destination());
    }
}

// ── PopulationTracker ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tracker_tests {
    use super::*;
    use crate::PopulationTracker;

    fn mixed() -> AgentTable {
        let mut t = AgentTable::zeroed(10);
        t.state[0] = HealthState::Infected;
        t.state[1] = HealthState::Infected;
        t.state[2] = HealthState::Immune;
        t.state[3] = HealthState::Deceased;
        t.in_treatment[0] = true;
        t
    }

    #[test]
    fn susceptible_excludes_recovered_without_reinfection() {
        let mut tracker = PopulationTracker::new(false);
        let c = tracker.record_tick(&mixed());
        assert_eq!((c.susceptible, c.infectious, c.recovered, c.fatalities), (6, 2, 1, 1));
        assert_eq!(c.in_treatment, 1);
    }

    #[test]
    fn susceptible_includes_recovered_with_reinfection() {
        let mut tracker = PopulationTracker::new(true);
        let c = tracker.record_tick(&mixed());
        assert_eq!(c.susceptible, 7);
    }

    #[test]
    fn series_append_and_peak() {
        let mut tracker = PopulationTracker::new(false);
        assert_eq!(tracker.peak_infectious(), 0);
        assert!(tracker.latest().is_none());

        let mut t = mixed();
        tracker.record_tick(&t);
        t.state[4] = HealthState::Infected;
        tracker.record_tick(&t);
        t.state[0] = HealthState::Immune;
        t.state[1] = HealthState::Immune;
        tracker.record_tick(&t);

        assert_eq!(tracker.len(), 3);
        assert_eq!(tracker.infectious, vec![2, 3, 1]);
        assert_eq!(tracker.peak_infectious(), 3);
        assert_eq!(tracker.latest().unwrap().recovered, 3);
    }
}

// ── LockdownState ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod lockdown_tests {
    use ep_core::SimRng;

    use super::*;
    use crate::LockdownState;

    #[test]
    fn trigger_uses_current_or_peak() {
        assert!(!LockdownState::triggered(9, 9, 10.0));
        assert!(LockdownState::triggered(10, 0, 10.0));
        assert!(LockdownState::triggered(0, 10, 10.0));
    }

    #[test]
    fn activation_draws_compliance_once() {
        let mut rng = SimRng::new(3);
        let mut state = LockdownState::default();
        assert!(state.set_active(true, 100, 0.5, &mut rng));
        let first = state.compliance().unwrap().to_vec();
        assert_eq!(first.len(), 100);
        assert!(!state.set_active(true, 100, 0.5, &mut rng));
        assert_eq!(state.compliance().unwrap(), first.as_slice());

        assert!(state.set_active(false, 100, 0.5, &mut rng));
        assert!(state.compliance().is_none());
    }

    #[test]
    fn apply_zeroes_compliant_and_caps_the_rest() {
        let mut rng = SimRng::new(3);
        let mut state = LockdownState::default();
        let mut t = AgentTable::zeroed(4);
        t.speed = vec![0.01, 0.0005, 0.02, 0.0];

        state.apply(&mut t, 0.001);
        assert_eq!(t.speed, vec![0.01, 0.0005, 0.02, 0.0]);

        state.set_active(true, 4, 0.0, &mut rng);
        state.apply(&mut t, 0.001);
        assert_eq!(t.speed, vec![0.001, 0.0005, 0.001, 0.0]);

        state.set_active(false, 4, 0.0, &mut rng);
        state.set_active(true, 4, 1.0, &mut rng);
        state.apply(&mut t, 0.001);
        assert!(t.speed.iter().all(|&s| s == 0.0));
    }
}

// ── RunSummary ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod summary_tests {
    use super::*;
    use crate::RunSummary;

    #[test]
    fn counts_from_final_table() {
        let mut t = AgentTable::zeroed(10);
        t.state[0] = HealthState::Infected;
        t.state[1] = HealthState::Immune;
        t.state[2] = HealthState::Immune;
        t.state[3] = HealthState::Deceased;
        let s = RunSummary::from_table(&t, Tick(42), StopReason::StepLimit, 4);
        assert_eq!(s.ticks_simulated, 42);
        assert_eq!((s.fatalities, s.recovered, s.infected), (1, 2, 1));
        assert_eq!((s.total_infected, s.never_infected), (4, 6));

        let text = s.to_string();
        assert!(text.starts_with("-----stopping (step limit reached)-----"));
        assert!(text.contains("total fatalities:    1"));
    }
}
