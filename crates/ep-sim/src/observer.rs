//! Simulation observer trait for progress reporting and data collection.

use ep_agent::AgentTable;
use ep_core::{AgentId, Tick};

use crate::{RunSummary, TickCounts};

/// Callbacks invoked by [`Sim`][crate::Sim] at key points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  Observers only ever see shared borrows.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, counts: &TickCounts) {
///         if tick.0 % self.interval == 0 {
///             println!("{tick}: {} infectious", counts.infectious);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after the infection phase with the agents infected this tick
    /// (only when there are any).
    fn on_new_infections(&mut self, _tick: Tick, _ids: &[AgentId]) {}

    /// Called at the end of each tick with the counts just recorded.
    fn on_tick_end(&mut self, _tick: Tick, _counts: &TickCounts) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks`
    /// ticks) with read-only access to the whole agent table.
    fn on_snapshot(&mut self, _tick: Tick, _agents: &AgentTable) {}

    /// Called once when [`Sim::run`][crate::Sim::run] stops, for whatever
    /// reason.
    fn on_sim_end(&mut self, _summary: &RunSummary) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
