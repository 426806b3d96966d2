//! CSV output backend.
//!
//! Creates two files in the output directory:
//! - `agent_snapshots.csv`
//! - `tick_summaries.csv`
//!
//! Booleans are written as `0`/`1`.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::{OutputWriter, ensure_dir};
use crate::{AgentSnapshotRow, OutputResult, TickSummaryRow};

pub const SNAPSHOT_HEADER: [&str; 13] = [
    "agent_id", "tick", "x", "y", "heading_x", "heading_y", "speed", "state", "age",
    "infected_at", "in_treatment", "destination", "arrived",
];

pub const SUMMARY_HEADER: [&str; 6] = [
    "tick", "susceptible", "infectious", "recovered", "fatalities", "in_treatment",
];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create (truncating) both CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        ensure_dir(dir)?;
        let mut snapshots = Writer::from_path(dir.join("agent_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADER)?;

        Ok(Self { snapshots, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.agent_id.to_string(),
                row.tick.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.heading_x.to_string(),
                row.heading_y.to_string(),
                row.speed.to_string(),
                row.state.to_string(),
                row.age.to_string(),
                row.infected_at.to_string(),
                (row.in_treatment as u8).to_string(),
                row.destination.to_string(),
                (row.arrived as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.susceptible.to_string(),
            row.infectious.to_string(),
            row.recovered.to_string(),
            row.fatalities.to_string(),
            row.in_treatment.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
