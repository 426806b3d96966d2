//! The `OutputWriter` trait implemented by every backend.

use std::path::Path;

use crate::{AgentSnapshotRow, OutputError, OutputResult, TickSummaryRow};

/// A sink for agent snapshots and per-tick head-counts.
///
/// Errors surface through [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error]
/// when the writer is driven by the observer.
pub trait OutputWriter {
    /// Write a batch of agent snapshots (one row per agent).
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()>;

    /// Write the head-counts of one tick.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying handles.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}

/// Backends write into an existing directory; they never create it.
pub(crate) fn ensure_dir(dir: &Path) -> OutputResult<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(OutputError::NotADirectory(dir.to_path_buf()))
    }
}
