//! Core agent storage: `AgentTable` (SoA data).
//!
//! The table is the authoritative per-agent state.  Phases read and write the
//! `pub` columns directly by index:
//!
//! ```ignore
//! let i = agent.index();
//! table.x[i] += table.heading_x[i] * table.speed[i];  // O(1), cache-friendly
//! ```
//!
//! Row count is fixed at construction; agents are never added or removed, only
//! their fields change.

use ep_core::{AgentId, Tick};

use crate::HealthState;

/// `active_destination` value meaning "no destination, roam freely".
pub const NO_DESTINATION: u16 = 0;

/// Structure-of-Arrays storage for all agent state.
#[derive(Clone, Debug)]
pub struct AgentTable {
    /// Number of agents.  Equals the length of every column.
    pub count: usize,

    // ── Kinematics ────────────────────────────────────────────────────────
    pub x: Vec<f64>,
    pub y: Vec<f64>,

    /// Unnormalized heading components.
    pub heading_x: Vec<f64>,
    pub heading_y: Vec<f64>,

    /// Non-negative scalar speed.
    pub speed: Vec<f64>,

    // ── Health ────────────────────────────────────────────────────────────
    pub state: Vec<HealthState>,

    /// Age in whole years, clamped to `[0, max_age]` at creation.
    pub age: Vec<u32>,

    /// Tick of infection.  Meaningless while `Healthy`.
    pub infected_at: Vec<Tick>,

    /// Drawn once at creation and never written afterwards.  An infected agent
    /// resolves once its recovery progress reaches this value.
    pub recovery_threshold: Vec<f64>,

    /// `true` only while `Infected` and admitted within healthcare capacity.
    pub in_treatment: Vec<bool>,

    // ── Destination routing ───────────────────────────────────────────────
    /// `NO_DESTINATION` or a 1-based slot into the `DestinationTable`.
    pub active_destination: Vec<u16>,

    /// Meaningful only while `active_destination != NO_DESTINATION`.
    pub arrived: Vec<bool>,

    /// Half-width / half-height of the box an arrived agent roams in.
    pub wander_x: Vec<f64>,
    pub wander_y: Vec<f64>,
}

impl AgentTable {
    /// A table of `count` agents with every field at its zero value: at the
    /// origin, motionless, healthy, age 0, no destination.
    pub fn zeroed(count: usize) -> Self {
        Self {
            count,
            x: vec![0.0; count],
            y: vec![0.0; count],
            heading_x: vec![0.0; count],
            heading_y: vec![0.0; count],
            speed: vec![0.0; count],
            state: vec![HealthState::Healthy; count],
            age: vec![0; count],
            infected_at: vec![Tick::ZERO; count],
            recovery_threshold: vec![0.0; count],
            in_treatment: vec![false; count],
            active_destination: vec![NO_DESTINATION; count],
            arrived: vec![false; count],
            wander_x: vec![0.0; count],
            wander_y: vec![0.0; count],
        }
    }

    /// `true` if there are no agents.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    /// `true` if `agent` is a row of this table.
    #[inline]
    pub fn contains(&self, agent: AgentId) -> bool {
        agent.index() < self.count
    }

    // ── State queries ─────────────────────────────────────────────────────

    /// Number of agents currently in `state`.
    pub fn count_in(&self, state: HealthState) -> usize {
        self.state.iter().filter(|&&s| s == state).count()
    }

    /// Ids of agents currently in `state`, ascending.
    pub fn ids_in(&self, state: HealthState) -> Vec<AgentId> {
        self.state
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s == state)
            .map(|(i, _)| AgentId(i as u32))
            .collect()
    }

    /// Number of agents currently in treatment.
    pub fn in_treatment_count(&self) -> usize {
        self.in_treatment.iter().filter(|&&t| t).count()
    }

    /// `true` if the agent has an active destination.
    #[inline]
    pub fn has_destination(&self, agent: AgentId) -> bool {
        self.active_destination[agent.index()] != NO_DESTINATION
    }

    /// `true` if any agent has an active destination.
    pub fn any_destination(&self) -> bool {
        self.active_destination.iter().any(|&d| d != NO_DESTINATION)
    }

    // ── Mutation helpers ──────────────────────────────────────────────────

    /// Move `agent` to `next`, enforcing the monotone lifecycle in debug
    /// builds.
    #[inline]
    pub fn set_state(&mut self, agent: AgentId, next: HealthState) {
        let i = agent.index();
        debug_assert!(
            self.state[i].can_transition_to(next),
            "illegal transition {} -> {next} for {agent}",
            self.state[i],
        );
        self.state[i] = next;
    }

    /// Infect `agent` at `tick`.  Does not touch treatment or routing.
    #[inline]
    pub fn infect(&mut self, agent: AgentId, tick: Tick) {
        self.set_state(agent, HealthState::Infected);
        self.infected_at[agent.index()] = tick;
    }
}
