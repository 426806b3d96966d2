//! Recovery or death of infected agents.

use ep_agent::{AgentTable, HealthState};
use ep_core::{AgentId, EpidemicConfig, SimRng, Tick};
use tracing::debug;

use crate::RiskCurve;

/// How far an infection has progressed toward resolution.
///
/// `max(0, (duration − min) / (max − min))`, with no upper bound.  When
/// `max == min` the window is a single instant: progress is `+∞` from
/// `duration >= min` on, and `0` before.
pub fn recovery_progress(duration: u64, min: u64, max: u64) -> f64 {
    if max <= min {
        return if duration >= min { f64::INFINITY } else { 0.0 };
    }
    let progress = (duration as f64 - min as f64) / (max - min) as f64;
    progress.max(0.0)
}

/// Agents resolved during one outcome pass, each list ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutcomeReport {
    pub recovered: Vec<AgentId>,
    pub deceased: Vec<AgentId>,
}

impl OutcomeReport {
    pub fn is_empty(&self) -> bool {
        self.recovered.is_empty() && self.deceased.is_empty()
    }
}

/// Resolve every infected agent whose recovery progress has reached its
/// threshold: one draw decides Deceased (draw `<=` mortality) or Immune.
/// Treatment ends either way.
pub fn resolve_outcomes(
    table:  &mut AgentTable,
    tick:   Tick,
    config: &EpidemicConfig,
    rng:    &mut SimRng,
) -> OutcomeReport {
    let (min, max) = config.recovery_duration;
    let curve = config.age_dependent_risk.then(|| RiskCurve::from_config(config));

    let eligible: Vec<AgentId> = table
        .agent_ids()
        .filter(|a| {
            let i = a.index();
            table.state[i] == HealthState::Infected
                && recovery_progress(tick.since(table.infected_at[i]), min, max)
                    >= table.recovery_threshold[i]
        })
        .collect();

    let mut report = OutcomeReport::default();
    for agent in eligible {
        let i = agent.index();
        let chance = mortality_chance(table, i, config, curve.as_ref());
        let next = if rng.random::<f64>() <= chance {
            report.deceased.push(agent);
            HealthState::Deceased
        } else {
            report.recovered.push(agent);
            HealthState::Immune
        };
        table.set_state(agent, next);
        table.in_treatment[i] = false;
    }

    if !report.deceased.is_empty() {
        debug!(%tick, ids = ?report.deceased, "deaths");
    }
    if !report.recovered.is_empty() {
        debug!(%tick, ids = ?report.recovered, "recoveries");
    }
    report
}

fn mortality_chance(
    table:  &AgentTable,
    i:      usize,
    config: &EpidemicConfig,
    curve:  Option<&RiskCurve>,
) -> f64 {
    let base = match curve {
        Some(curve) => curve.mortality(table.age[i]),
        None => config.mortality_chance,
    };
    if !config.treatment_dependent_risk {
        base
    } else if table.in_treatment[i] {
        base * config.treatment_factor
    } else {
        base * config.no_treatment_factor
    }
}
