//! Infection spread.
//!
//! # Strategies
//!
//! Two equivalent algorithms, picked per tick by [`InfectionStrategy::select`]
//! on the size of the infected population:
//!
//! - **Infected-centric**: for each infectious agent, find healthy agents in
//!   its zone; each gets one trial at `infection_chance`.
//! - **Healthy-centric**: for each healthy agent, count infectious agents in
//!   its zone; one trial at `infection_chance × count` (not clamped).
//!
//! Whichever side is smaller drives the outer loop.
//!
//! # Snapshot rule
//!
//! Both partitions are taken once at entry.  An agent infected during the
//! pass is not in the infectious index, so it never infects anyone else in
//! the same tick.

use ep_agent::{AgentTable, DestinationTable, HealthState, NO_DESTINATION};
use ep_core::{AgentId, Bounds, EpidemicConfig, SimRng, Tick};
use ep_mobility::route_to_destination;
use ep_spatial::{NeighborKind, Neighborhoods};
use tracing::debug;

use crate::DiseaseResult;

/// Destination slot of the isolation ward.
pub const ISOLATION_SLOT: u16 = 1;

/// Which side of the population drives the infection pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InfectionStrategy {
    InfectedCentric,
    HealthyCentric,
}

impl InfectionStrategy {
    /// Infected-centric while fewer than half the population is infected.
    pub fn select(infected: usize, pop_size: usize) -> Self {
        if infected < pop_size / 2 {
            InfectionStrategy::InfectedCentric
        } else {
            InfectionStrategy::HealthyCentric
        }
    }
}

/// Result of one infection pass.
#[derive(Clone, Debug)]
pub struct InfectionReport {
    pub strategy: InfectionStrategy,
    /// Newly infected agents in the order they were infected.
    pub newly_infected: Vec<AgentId>,
    /// How many of them were admitted to treatment.
    pub admitted: usize,
    /// How many of them were sent to the isolation ward.
    pub isolated: usize,
}

/// Run one infection pass at `tick`, choosing the strategy automatically.
///
/// # Errors
///
/// Only if isolation routing is enabled and the destination table has no
/// [`ISOLATION_SLOT`].
pub fn spread_infection(
    table:        &mut AgentTable,
    destinations: &mut DestinationTable,
    tick:         Tick,
    config:       &EpidemicConfig,
    rng:          &mut SimRng,
) -> DiseaseResult<InfectionReport> {
    let infected = table.count_in(HealthState::Infected);
    let strategy = InfectionStrategy::select(infected, table.count);
    spread_with(strategy, table, destinations, tick, config, rng)
}

/// [`spread_infection`] with the strategy forced.
pub fn spread_with(
    strategy:     InfectionStrategy,
    table:        &mut AgentTable,
    destinations: &mut DestinationTable,
    tick:         Tick,
    config:       &EpidemicConfig,
    rng:          &mut SimRng,
) -> DiseaseResult<InfectionReport> {
    let healthy = table.ids_in(HealthState::Healthy);
    let infectious = infectious_ids(table, config.traveling_infects);

    let mut pass = Pass {
        tick,
        config,
        in_treatment: table.in_treatment_count(),
        isolation: config.isolation_area(),
        report: InfectionReport {
            strategy,
            newly_infected: Vec::new(),
            admitted: 0,
            isolated: 0,
        },
    };

    if healthy.is_empty() || infectious.is_empty() {
        return Ok(pass.report);
    }
    let zones = Neighborhoods::build(table, &healthy, &infectious);
    let range = config.infection_range;

    match strategy {
        InfectionStrategy::InfectedCentric => {
            for &source in &infectious {
                let s = source.index();
                let zone = Bounds::around(table.x[s], table.y[s], range);
                for target in zones.query(NeighborKind::Healthy, &zone) {
                    if table.state[target.index()] != HealthState::Healthy {
                        continue;
                    }
                    if rng.random::<f64>() < config.infection_chance {
                        pass.infect(table, destinations, target, rng)?;
                    }
                }
            }
        }
        InfectionStrategy::HealthyCentric => {
            let counts = infectious_neighbor_counts(table, &zones, &healthy, range);
            for (&target, count) in healthy.iter().zip(counts) {
                if count == 0 {
                    continue;
                }
                if rng.random::<f64>() < config.infection_chance * count as f64 {
                    pass.infect(table, destinations, target, rng)?;
                }
            }
        }
    }

    if !pass.report.newly_infected.is_empty() {
        debug!(%tick, ?strategy, ids = ?pass.report.newly_infected, "new infections");
    }
    Ok(pass.report)
}

/// Infected agents that exert pressure: all of them, or only those without a
/// destination when travelers do not infect.
fn infectious_ids(table: &AgentTable, traveling_infects: bool) -> Vec<AgentId> {
    table
        .agent_ids()
        .filter(|a| {
            let i = a.index();
            table.state[i] == HealthState::Infected
                && (traveling_infects || table.active_destination[i] == NO_DESTINATION)
        })
        .collect()
}

/// Infectious-neighbour count for each id in `healthy`, in the same order.
/// Read-only over the snapshot.
#[cfg(not(feature = "parallel"))]
fn infectious_neighbor_counts(
    table:   &AgentTable,
    zones:   &Neighborhoods,
    healthy: &[AgentId],
    range:   f64,
) -> Vec<usize> {
    healthy
        .iter()
        .map(|a| {
            let i = a.index();
            zones.count(NeighborKind::Infected, &Bounds::around(table.x[i], table.y[i], range))
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn infectious_neighbor_counts(
    table:   &AgentTable,
    zones:   &Neighborhoods,
    healthy: &[AgentId],
    range:   f64,
) -> Vec<usize> {
    use rayon::prelude::*;

    healthy
        .par_iter()
        .map(|a| {
            let i = a.index();
            zones.count(NeighborKind::Infected, &Bounds::around(table.x[i], table.y[i], range))
        })
        .collect()
}

// ── Infection transition ──────────────────────────────────────────────────────

/// Running state shared by every infection in one pass.
struct Pass<'c> {
    tick: Tick,
    config: &'c EpidemicConfig,
    /// Kept in step with the table as agents are admitted.
    in_treatment: usize,
    isolation: Bounds,
    report: InfectionReport,
}

impl Pass<'_> {
    fn infect(
        &mut self,
        table:        &mut AgentTable,
        destinations: &mut DestinationTable,
        agent:        AgentId,
        rng:          &mut SimRng,
    ) -> DiseaseResult<()> {
        table.infect(agent, self.tick);
        self.report.newly_infected.push(agent);

        if self.in_treatment >= self.config.healthcare_capacity {
            return Ok(());
        }
        table.in_treatment[agent.index()] = true;
        self.in_treatment += 1;
        self.report.admitted += 1;

        if self.config.self_isolate && rng.random::<f64>() < self.config.self_isolate_proportion {
            route_to_destination(table, destinations, agent, ISOLATION_SLOT, &self.isolation)?;
            self.report.isolated += 1;
        }
        Ok(())
    }
}

// ── Named neighbourhood lookup ────────────────────────────────────────────────

/// Agents of the named partition (`"healthy"` or `"infected"`) strictly inside
/// `zone`, ascending.  Every infected agent counts, travelers included.
///
/// # Errors
///
/// [`DiseaseError::Spatial`](crate::DiseaseError::Spatial) wrapping
/// `InvalidQueryKind` for any other `kind`.
pub fn find_nearby(table: &AgentTable, zone: &Bounds, kind: &str) -> DiseaseResult<Vec<AgentId>> {
    let kind: NeighborKind = kind.parse()?;
    let state = match kind {
        NeighborKind::Healthy => HealthState::Healthy,
        NeighborKind::Infected => HealthState::Infected,
    };
    Ok(table
        .agent_ids()
        .filter(|a| {
            let i = a.index();
            table.state[i] == state && zone.contains_strict(table.x[i], table.y[i])
        })
        .collect())
}
