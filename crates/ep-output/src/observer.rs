//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use ep_agent::AgentTable;
use ep_core::Tick;
use ep_sim::{RunSummary, SimObserver, TickCounts};
use tracing::{info, warn};

use crate::row::{AgentSnapshotRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes agent snapshots and tick summaries to any
/// [`OutputWriter`] backend.
///
/// `SimObserver` methods cannot fail, so the first write error is kept and
/// later writes still go ahead.  Check [`take_error`][Self::take_error] after
/// `sim.run()` returns.
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    rows:       u64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, rows: 0, last_error: None }
    }

    /// Take the stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Snapshot rows written so far.
    pub fn snapshot_rows(&self) -> u64 {
        self.rows
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                warn!(error = %e, "output write failed");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, counts: &TickCounts) {
        let result = self.writer.write_tick_summary(&TickSummaryRow::new(tick, counts));
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &AgentTable) {
        let rows = AgentSnapshotRow::from_table(tick, agents);
        if rows.is_empty() {
            return;
        }
        let result = self.writer.write_snapshots(&rows);
        if result.is_ok() {
            self.rows += rows.len() as u64;
        }
        self.store_err(result);
    }

    fn on_sim_end(&mut self, summary: &RunSummary) {
        let result = self.writer.finish();
        self.store_err(result);
        info!(ticks = summary.ticks_simulated, snapshot_rows = self.rows, "output closed");
    }
}
