//! Plain data row types written by output backends.

use ep_agent::AgentTable;
use ep_core::Tick;
use ep_sim::TickCounts;

/// One agent's full state at a snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshotRow {
    pub agent_id:     u32,
    pub tick:         u64,
    pub x:            f64,
    pub y:            f64,
    pub heading_x:    f64,
    pub heading_y:    f64,
    pub speed:        f64,
    /// `HealthState` code: 0 healthy, 1 infected, 2 immune, 3 deceased.
    pub state:        u8,
    pub age:          u32,
    /// Tick of infection; 0 when never infected.
    pub infected_at:  u64,
    pub in_treatment: bool,
    /// Active destination slot; 0 when roaming freely.
    pub destination:  u16,
    pub arrived:      bool,
}

impl AgentSnapshotRow {
    /// Every agent of `table`, ascending by id.
    pub fn from_table(tick: Tick, table: &AgentTable) -> Vec<Self> {
        (0..table.count)
            .map(|i| Self {
                agent_id:     i as u32,
                tick:         tick.0,
                x:            table.x[i],
                y:            table.y[i],
                heading_x:    table.heading_x[i],
                heading_y:    table.heading_y[i],
                speed:        table.speed[i],
                state:        table.state[i].code(),
                age:          table.age[i],
                infected_at:  table.infected_at[i].0,
                in_treatment: table.in_treatment[i],
                destination:  table.active_destination[i],
                arrived:      table.arrived[i],
            })
            .collect()
    }
}

/// Head-counts at the end of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:         u64,
    pub susceptible:  u64,
    pub infectious:   u64,
    pub recovered:    u64,
    pub fatalities:   u64,
    pub in_treatment: u64,
}

impl TickSummaryRow {
    pub fn new(tick: Tick, counts: &TickCounts) -> Self {
        Self {
            tick:         tick.0,
            susceptible:  counts.susceptible as u64,
            infectious:   counts.infectious as u64,
            recovered:    counts.recovered as u64,
            fatalities:   counts.fatalities as u64,
            in_treatment: counts.in_treatment as u64,
        }
    }
}
