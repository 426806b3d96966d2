//! Fluent builder for constructing a [`Sim`].

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use ep_agent::{AgentTable, DestinationTable, initialize};
use ep_core::{AgentId, EpidemicConfig, SimRng, Tick};
use ep_mobility::MotionNoise;

use crate::sim::BOUNDARY_MARGIN;
use crate::{LockdownState, PopulationTracker, Sim, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                                         |
/// |--------------------------|-------------------------------------------------|
/// | `.agents(t)`             | Random population drawn from the config         |
/// | `.destination_slots(n)`  | 1 (the isolation ward)                          |
/// | `.seed_infection(t, a)`  | Agent 0 at `config.patient_zero_tick`, if set   |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(EpidemicConfig::default()).build()?;
/// let summary = sim.run(&mut NoopObserver)?;
/// println!("{summary}");
/// ```
pub struct SimBuilder {
    config:            EpidemicConfig,
    agents:            Option<AgentTable>,
    destination_slots: usize,
    seeds:             Vec<(Tick, AgentId)>,
}

impl SimBuilder {
    pub fn new(config: EpidemicConfig) -> Self {
        Self {
            config,
            agents:            None,
            destination_slots: 1,
            seeds:             Vec::new(),
        }
    }

    /// Use a prepared population instead of drawing one.  Its row count must
    /// equal `config.pop_size`.
    pub fn agents(mut self, agents: AgentTable) -> Self {
        self.agents = Some(agents);
        self
    }

    /// Number of destination slots per agent.  Slot 1 is the isolation ward.
    pub fn destination_slots(mut self, slots: usize) -> Self {
        self.destination_slots = slots;
        self
    }

    /// Infect `agent` at the start of `tick`, in addition to patient zero.
    pub fn seed_infection(mut self, tick: Tick, agent: AgentId) -> Self {
        self.seeds.push((tick, agent));
        self
    }

    /// Validate the configuration, draw the population, and return a
    /// ready-to-run [`Sim`] positioned at tick 0.
    ///
    /// # Errors
    ///
    /// - [`SimError::Config`] if the configuration is invalid.
    /// - [`SimError::AgentCountMismatch`] if a supplied table has the wrong
    ///   size.
    /// - [`SimError::AgentNotFound`] if a seed names a missing agent.
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;
        let pop_size = self.config.pop_size;
        let mut rng = SimRng::new(self.config.seed);

        let agents = match self.agents {
            Some(table) => {
                if table.count != pop_size {
                    return Err(SimError::AgentCountMismatch {
                        expected: pop_size,
                        got:      table.count,
                        what:     "agent table",
                    });
                }
                table
            }
            None => initialize(
                pop_size,
                self.config.mean_age,
                self.config.max_age,
                self.config.world_bounds(),
                self.config.speed,
                &mut rng,
            )?,
        };

        let patient_zero = self.config.patient_zero_tick.map(|t| (Tick(t), AgentId(0)));
        let mut seeds: BTreeMap<Tick, Vec<AgentId>> = BTreeMap::new();
        for (tick, agent) in patient_zero.into_iter().chain(self.seeds) {
            if !agents.contains(agent) {
                return Err(SimError::AgentNotFound(agent));
            }
            seeds.entry(tick).or_default().push(agent);
        }

        Ok(Sim {
            destinations: DestinationTable::new(pop_size, self.destination_slots),
            tracker:      PopulationTracker::new(self.config.reinfect),
            lockdown:     LockdownState::default(),
            world:        self.config.world_bounds().inset(BOUNDARY_MARGIN),
            noise:        MotionNoise::from_config(&self.config),
            interrupt:    Arc::new(AtomicBool::new(false)),
            tick:         Tick::ZERO,
            config:       self.config,
            agents,
            rng,
            seeds,
        })
    }
}
