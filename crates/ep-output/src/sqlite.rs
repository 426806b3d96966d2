//! SQLite output backend (feature `sqlite`).
//!
//! One `output.db` in the output directory with two tables,
//! `agent_snapshots` and `tick_summaries`.

use std::path::Path;

use rusqlite::{Connection, params};

use crate::writer::{OutputWriter, ensure_dir};
use crate::{AgentSnapshotRow, OutputResult, TickSummaryRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        ensure_dir(dir)?;
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS agent_snapshots (
                 agent_id     INTEGER NOT NULL,
                 tick         INTEGER NOT NULL,
                 x            REAL    NOT NULL,
                 y            REAL    NOT NULL,
                 heading_x    REAL    NOT NULL,
                 heading_y    REAL    NOT NULL,
                 speed        REAL    NOT NULL,
                 state        INTEGER NOT NULL,
                 age          INTEGER NOT NULL,
                 infected_at  INTEGER NOT NULL,
                 in_treatment INTEGER NOT NULL,
                 destination  INTEGER NOT NULL,
                 arrived      INTEGER NOT NULL,
                 PRIMARY KEY (tick, agent_id)
             );
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 tick         INTEGER PRIMARY KEY,
                 susceptible  INTEGER NOT NULL,
                 infectious   INTEGER NOT NULL,
                 recovered    INTEGER NOT NULL,
                 fatalities   INTEGER NOT NULL,
                 in_treatment INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO agent_snapshots \
                 (agent_id, tick, x, y, heading_x, heading_y, speed, state, age, \
                  infected_at, in_treatment, destination, arrived) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            )?;
            for row in rows {
                stmt.execute(params![
                    row.agent_id,
                    row.tick as i64,
                    row.x,
                    row.y,
                    row.heading_x,
                    row.heading_y,
                    row.speed,
                    row.state,
                    row.age,
                    row.infected_at as i64,
                    row.in_treatment as i64,
                    row.destination,
                    row.arrived as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_summaries \
             (tick, susceptible, infectious, recovered, fatalities, in_treatment) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                row.tick as i64,
                row.susceptible as i64,
                row.infectious as i64,
                row.recovered as i64,
                row.fatalities as i64,
                row.in_treatment as i64,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
