//! The `Sim` struct and its tick loop.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ep_agent::{AgentTable, DestinationTable, HealthState, NO_DESTINATION};
use ep_core::{AgentId, Bounds, EpidemicConfig, SimRng, Tick};
use ep_disease::{resolve_outcomes, spread_infection};
use ep_mobility::{
    MotionNoise, confine_to_bounds, detect_arrivals, freeze_deceased, hold_at_destination,
    integrate_positions, randomize_motion, reflect_out_of_bounds, release_immune,
    reset_destinations, route_to_destination, steer_travelers,
};
use tracing::{debug, info, warn};

use crate::{
    LockdownState, PopulationTracker, RunSummary, SimError, SimObserver, SimResult, StopReason,
    TickCounts,
};

/// Free agents turn around this far inside the world bounds.
pub const BOUNDARY_MARGIN: f64 = 0.02;

/// The no-infections stop is only considered once this many ticks have run.
pub const NO_INFECTION_GRACE_TICKS: u64 = 500;

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Owns the agent table, the destination table, the tracker, the lockdown
/// state, and the one random source of the run.  Each tick runs the same
/// fixed phase order:
///
/// 0. **Seeds**: scheduled infections for this tick (patient zero).
/// 1. **Destinations**: steer travelers, detect arrivals, hold arrived agents.
/// 2. **Walls**: reflect free agents off the world bounds.
/// 3. **Motion policy**: lockdown speed caps when active, otherwise random
///    heading/speed changes.
/// 4. **Freeze** the deceased.
/// 5. **Integrate** positions.
/// 6. **Infection** spread.
/// 7. **Outcomes**: recovery or death.
/// 8. **Release** immune agents from their destinations.
/// 9. **Record** the tick in the tracker.
///
/// [`run`](Self::run) then applies the termination checks.  Create via
/// [`SimBuilder`][crate::SimBuilder].
#[derive(Debug)]
pub struct Sim {
    /// Parameters, validated at build time.
    pub config: EpidemicConfig,

    /// Authoritative per-agent state.
    pub agents: AgentTable,

    /// Destination slot centres, indexed like `agents`.
    pub destinations: DestinationTable,

    pub tracker: PopulationTracker,

    pub lockdown: LockdownState,

    pub(crate) rng: SimRng,
    pub(crate) tick: Tick,
    pub(crate) seeds: BTreeMap<Tick, Vec<AgentId>>,
    pub(crate) interrupt: Arc<AtomicBool>,
    /// World bounds inset by [`BOUNDARY_MARGIN`].
    pub(crate) world: Bounds,
    pub(crate) noise: MotionNoise,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// The next tick to be simulated; equals the number of ticks run so far.
    #[inline]
    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    /// Flag that stops [`run`](Self::run) before the next tick when set.  A
    /// tick already in progress always completes.
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }

    /// Schedule `agent` to be infected at the start of `tick`.  Seeds for
    /// ticks already simulated never fire.
    pub fn seed_infection(&mut self, tick: Tick, agent: AgentId) -> SimResult<()> {
        if !self.agents.contains(agent) {
            return Err(SimError::AgentNotFound(agent));
        }
        self.seeds.entry(tick).or_default().push(agent);
        Ok(())
    }

    /// Send one agent toward the centre of `bounds` on destination `slot`.
    pub fn route_agent(&mut self, agent: AgentId, slot: u16, bounds: &Bounds) -> SimResult<()> {
        if !self.agents.contains(agent) {
            return Err(SimError::AgentNotFound(agent));
        }
        route_to_destination(&mut self.agents, &mut self.destinations, agent, slot, bounds)?;
        Ok(())
    }

    /// Confine the whole population to `bounds` on destination `slot`,
    /// optionally teleporting everyone inside first.
    pub fn confine(&mut self, slot: u16, bounds: &Bounds, teleport: bool) -> SimResult<()> {
        confine_to_bounds(
            &mut self.agents,
            &mut self.destinations,
            slot,
            bounds,
            teleport,
            &mut self.rng,
        )?;
        info!(slot, %bounds, teleport, "population confined");
        Ok(())
    }

    /// Release the given agents from their destinations (all of them when
    /// `ids` is empty).
    pub fn release(&mut self, ids: &[AgentId]) {
        reset_destinations(&mut self.agents, ids);
    }

    /// Run until a stop condition holds, then report.
    ///
    /// Stops when `simulation_steps` ticks have been simulated, when the
    /// interrupt flag is raised, or (with `end_if_no_infections`, from tick
    /// [`NO_INFECTION_GRACE_TICKS`] on) when nobody is infected.  The
    /// observer's `on_sim_end` is called in every case.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunSummary> {
        let reason = loop {
            if self.tick.0 >= self.config.simulation_steps {
                break StopReason::StepLimit;
            }
            if self.interrupt.load(Ordering::Relaxed) {
                warn!(tick = %self.tick, "run interrupted");
                break StopReason::Interrupted;
            }
            let counts = self.step(observer)?;
            if self.config.end_if_no_infections
                && self.tick.0 >= NO_INFECTION_GRACE_TICKS
                && counts.infectious == 0
            {
                break StopReason::NoInfections;
            }
        };

        let summary = self.summary(reason);
        info!(
            ticks = summary.ticks_simulated,
            reason = %reason,
            fatalities = summary.fatalities,
            recovered = summary.recovered,
            "simulation finished"
        );
        observer.on_sim_end(&summary);
        Ok(summary)
    }

    /// Run exactly `n` ticks from the current position, ignoring every stop
    /// condition.
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Summary of the run so far.
    pub fn summary(&self, reason: StopReason) -> RunSummary {
        RunSummary::from_table(&self.agents, self.tick, reason, self.tracker.peak_infectious())
    }

    /// Simulate one tick and advance the clock.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<TickCounts> {
        let now = self.tick;
        observer.on_tick_start(now);

        // ── Phase 0: scheduled infections ─────────────────────────────────
        if let Some(ids) = self.seeds.remove(&now) {
            self.apply_seeds(now, &ids);
        }

        // ── Phase 1: destination routing + arrival + holding ──────────────
        if self.agents.any_destination() {
            self.update_destinations();
        }

        // ── Phase 2: world walls (free agents only) ───────────────────────
        reflect_out_of_bounds(&mut self.agents, &self.world, &mut self.rng);

        // ── Phase 3: lockdown policy or random motion ─────────────────────
        if self.lockdown_engaged() {
            self.lockdown.apply(&mut self.agents, self.config.lockdown_speed_ceiling);
        } else {
            randomize_motion(&mut self.agents, &self.noise, &mut self.rng);
        }

        // ── Phases 4–5: freeze the dead, then move everyone ───────────────
        freeze_deceased(&mut self.agents);
        integrate_positions(&mut self.agents);

        // ── Phase 6: infection ────────────────────────────────────────────
        let infections = spread_infection(
            &mut self.agents,
            &mut self.destinations,
            now,
            &self.config,
            &mut self.rng,
        )?;
        if !infections.newly_infected.is_empty() {
            observer.on_new_infections(now, &infections.newly_infected);
        }

        // ── Phase 7: recovery / death ─────────────────────────────────────
        let outcomes = resolve_outcomes(&mut self.agents, now, &self.config, &mut self.rng);

        if self.config.verbose && !(infections.newly_infected.is_empty() && outcomes.is_empty()) {
            info!(
                tick = %now,
                infected = infections.newly_infected.len(),
                recovered = outcomes.recovered.len(),
                died = outcomes.deceased.len(),
                "tick events"
            );
        }

        // ── Phase 8: immune agents roam freely again ──────────────────────
        release_immune(&mut self.agents);

        // ── Phase 9: record ───────────────────────────────────────────────
        let counts = self.tracker.record_tick(&self.agents);
        observer.on_tick_end(now, &counts);

        let interval = self.config.output_interval_ticks;
        if interval > 0 && now.0 % interval == 0 {
            observer.on_snapshot(now, &self.agents);
        }

        self.tick = now.next();
        Ok(counts)
    }

    // ── Phase helpers ─────────────────────────────────────────────────────

    /// Infect seeded agents that are still healthy.  They enter treatment
    /// when capacity allows.
    fn apply_seeds(&mut self, now: Tick, ids: &[AgentId]) {
        for &agent in ids {
            let i = agent.index();
            if self.agents.state[i] != HealthState::Healthy {
                continue;
            }
            let admit = self.agents.in_treatment_count() < self.config.healthcare_capacity;
            self.agents.infect(agent, now);
            self.agents.in_treatment[i] = admit;
            info!(%agent, tick = %now, treated = admit, "seeding infection");
        }
    }

    fn update_destinations(&mut self) {
        let agents = &mut self.agents;
        if any_routed(agents, false) {
            steer_travelers(agents, &self.destinations);
            let arrived = detect_arrivals(
                agents,
                &self.destinations,
                self.config.wander_factor_dest,
                self.config.speed,
                &mut self.rng,
            );
            if !arrived.is_empty() {
                debug!(tick = %self.tick, ids = ?arrived, "arrived at destination");
            }
        }
        if any_routed(agents, true) {
            hold_at_destination(agents, &self.destinations, self.config.wander_factor, &mut self.rng);
        }
    }

    /// Update the lockdown state from the current and peak infected counts.
    /// `true` while it is active.
    fn lockdown_engaged(&mut self) -> bool {
        if !self.config.lockdown {
            return false;
        }
        let triggered = LockdownState::triggered(
            self.agents.count_in(HealthState::Infected),
            self.tracker.peak_infectious(),
            self.config.lockdown_threshold(),
        );
        self.lockdown.set_active(
            triggered,
            self.agents.count,
            self.config.lockdown_compliance,
            &mut self.rng,
        );
        self.lockdown.is_active()
    }
}

/// Whether any agent with a destination has (or has not) arrived.
fn any_routed(table: &AgentTable, arrived: bool) -> bool {
    table
        .active_destination
        .iter()
        .zip(&table.arrived)
        .any(|(&slot, &a)| slot != NO_DESTINATION && a == arrived)
}
