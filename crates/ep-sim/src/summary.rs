//! End-of-run report.

use std::fmt;

use ep_agent::{AgentTable, HealthState};
use ep_core::Tick;

/// Why [`Sim::run`][crate::Sim::run] stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// `simulation_steps` ticks were simulated.
    StepLimit,
    /// No agent was infected any more (checked from tick 500 on).
    NoInfections,
    /// The interrupt flag was raised.
    Interrupted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopReason::StepLimit => "step limit reached",
            StopReason::NoInfections => "no infections left",
            StopReason::Interrupted => "interrupted",
        })
    }
}

/// Final head-counts of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    pub ticks_simulated: u64,
    pub stop_reason:     StopReason,
    pub pop_size:        usize,
    pub fatalities:      usize,
    pub recovered:       usize,
    /// Still infected when the run stopped.
    pub infected:        usize,
    /// Everyone who was infected at some point: `pop_size − never_infected`.
    pub total_infected:  usize,
    pub never_infected:  usize,
    pub peak_infectious: usize,
}

impl RunSummary {
    pub fn from_table(
        table:           &AgentTable,
        final_tick:      Tick,
        stop_reason:     StopReason,
        peak_infectious: usize,
    ) -> Self {
        let never_infected = table.count_in(HealthState::Healthy);
        Self {
            ticks_simulated: final_tick.0,
            stop_reason,
            pop_size: table.count,
            fatalities: table.count_in(HealthState::Deceased),
            recovered: table.count_in(HealthState::Immune),
            infected: table.count_in(HealthState::Infected),
            total_infected: table.count - never_infected,
            never_infected,
            peak_infectious,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-----stopping ({})-----", self.stop_reason)?;
        writeln!(f, "ticks simulated:     {}", self.ticks_simulated)?;
        writeln!(f, "total fatalities:    {}", self.fatalities)?;
        writeln!(f, "total recovered:     {}", self.recovered)?;
        writeln!(f, "still infected:      {}", self.infected)?;
        writeln!(f, "total ever infected: {}", self.total_infected)?;
        writeln!(f, "never infected:      {}", self.never_infected)?;
        write!(f, "peak infectious:     {}", self.peak_infectious)
    }
}
