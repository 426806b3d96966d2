//! Append-only population time series.

use ep_agent::{AgentTable, HealthState};

/// Head-counts at the end of one tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickCounts {
    pub susceptible: usize,
    pub infectious:  usize,
    pub recovered:   usize,
    pub fatalities:  usize,
    /// Not part of the tracked series; reported for observers.
    pub in_treatment: usize,
}

/// Four parallel series, one entry per recorded tick.  Entries are never
/// rewritten.
#[derive(Clone, Debug, Default)]
pub struct PopulationTracker {
    /// Treat recovered agents as still susceptible when deriving
    /// `susceptible`.
    pub reinfect: bool,

    pub susceptible: Vec<usize>,
    pub infectious:  Vec<usize>,
    pub recovered:   Vec<usize>,
    pub fatalities:  Vec<usize>,
}

impl PopulationTracker {
    pub fn new(reinfect: bool) -> Self {
        Self { reinfect, ..Self::default() }
    }

    /// Count the table and append one entry to each series.
    pub fn record_tick(&mut self, table: &AgentTable) -> TickCounts {
        let mut by_state = [0usize; 4];
        for &s in &table.state {
            by_state[s.code() as usize] += 1;
        }
        let infectious = by_state[HealthState::Infected.code() as usize];
        let recovered = by_state[HealthState::Immune.code() as usize];
        let fatalities = by_state[HealthState::Deceased.code() as usize];
        let susceptible = if self.reinfect {
            table.count - infectious - fatalities
        } else {
            table.count - infectious - recovered - fatalities
        };

        self.susceptible.push(susceptible);
        self.infectious.push(infectious);
        self.recovered.push(recovered);
        self.fatalities.push(fatalities);

        TickCounts {
            susceptible,
            infectious,
            recovered,
            fatalities,
            in_treatment: table.in_treatment_count(),
        }
    }

    /// Number of recorded ticks.
    #[inline]
    pub fn len(&self) -> usize {
        self.infectious.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.infectious.is_empty()
    }

    /// Highest infectious count recorded so far (0 before the first tick).
    pub fn peak_infectious(&self) -> usize {
        self.infectious.iter().copied().max().unwrap_or(0)
    }

    /// The most recent entry, without the treatment count.
    pub fn latest(&self) -> Option<TickCounts> {
        let last = self.len().checked_sub(1)?;
        Some(TickCounts {
            susceptible: self.susceptible[last],
            infectious: self.infectious[last],
            recovered: self.recovered[last],
            fatalities: self.fatalities[last],
            in_treatment: 0,
        })
    }
}
