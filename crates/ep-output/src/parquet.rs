//! Parquet output backend (feature `parquet`).
//!
//! Creates two files in the output directory:
//! - `agent_snapshots.parquet`
//! - `tick_summaries.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    BooleanBuilder, Float64Builder, UInt8Builder, UInt16Builder, UInt32Builder, UInt64Builder,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::{OutputWriter, ensure_dir};
use crate::{AgentSnapshotRow, OutputResult, TickSummaryRow};

fn snapshot_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("agent_id",     DataType::UInt32,  false),
        Field::new("tick",         DataType::UInt64,  false),
        Field::new("x",            DataType::Float64, false),
        Field::new("y",            DataType::Float64, false),
        Field::new("heading_x",    DataType::Float64, false),
        Field::new("heading_y",    DataType::Float64, false),
        Field::new("speed",        DataType::Float64, false),
        Field::new("state",        DataType::UInt8,   false),
        Field::new("age",          DataType::UInt32,  false),
        Field::new("infected_at",  DataType::UInt64,  false),
        Field::new("in_treatment", DataType::Boolean, false),
        Field::new("destination",  DataType::UInt16,  false),
        Field::new("arrived",      DataType::Boolean, false),
    ]))
}

fn summary_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("tick",         DataType::UInt64, false),
        Field::new("susceptible",  DataType::UInt64, false),
        Field::new("infectious",   DataType::UInt64, false),
        Field::new("recovered",    DataType::UInt64, false),
        Field::new("fatalities",   DataType::UInt64, false),
        Field::new("in_treatment", DataType::UInt64, false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes simulation output to two Parquet files.
///
/// `finish()` **must** be called to write the file footers; files written
/// without it cannot be opened by Parquet readers.
pub struct ParquetWriter {
    snapshots:   Option<ArrowWriter<File>>,
    summaries:   Option<ArrowWriter<File>>,
    snap_schema: Arc<Schema>,
    summ_schema: Arc<Schema>,
}

impl ParquetWriter {
    /// Create both Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        ensure_dir(dir)?;
        let snap_schema = snapshot_schema();
        let summ_schema = summary_schema();

        let snap_file = File::create(dir.join("agent_snapshots.parquet"))?;
        let snapshots = ArrowWriter::try_new(snap_file, Arc::clone(&snap_schema), Some(snappy_props()))?;

        let summ_file = File::create(dir.join("tick_summaries.parquet"))?;
        let summaries = ArrowWriter::try_new(summ_file, Arc::clone(&summ_schema), Some(snappy_props()))?;

        Ok(Self {
            snapshots: Some(snapshots),
            summaries: Some(summaries),
            snap_schema,
            summ_schema,
        })
    }
}

impl OutputWriter for ParquetWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.snapshots.as_mut() else {
            return Ok(());
        };

        let mut agent_ids    = UInt32Builder::new();
        let mut ticks        = UInt64Builder::new();
        let mut xs           = Float64Builder::new();
        let mut ys           = Float64Builder::new();
        let mut headings_x   = Float64Builder::new();
        let mut headings_y   = Float64Builder::new();
        let mut speeds       = Float64Builder::new();
        let mut states       = UInt8Builder::new();
        let mut ages         = UInt32Builder::new();
        let mut infected_at  = UInt64Builder::new();
        let mut in_treatment = BooleanBuilder::new();
        let mut destinations = UInt16Builder::new();
        let mut arrived      = BooleanBuilder::new();

        for row in rows {
            agent_ids.append_value(row.agent_id);
            ticks.append_value(row.tick);
            xs.append_value(row.x);
            ys.append_value(row.y);
            headings_x.append_value(row.heading_x);
            headings_y.append_value(row.heading_y);
            speeds.append_value(row.speed);
            states.append_value(row.state);
            ages.append_value(row.age);
            infected_at.append_value(row.infected_at);
            in_treatment.append_value(row.in_treatment);
            destinations.append_value(row.destination);
            arrived.append_value(row.arrived);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.snap_schema),
            vec![
                Arc::new(agent_ids.finish()),
                Arc::new(ticks.finish()),
                Arc::new(xs.finish()),
                Arc::new(ys.finish()),
                Arc::new(headings_x.finish()),
                Arc::new(headings_y.finish()),
                Arc::new(speeds.finish()),
                Arc::new(states.finish()),
                Arc::new(ages.finish()),
                Arc::new(infected_at.finish()),
                Arc::new(in_treatment.finish()),
                Arc::new(destinations.finish()),
                Arc::new(arrived.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        let Some(writer) = self.summaries.as_mut() else {
            return Ok(());
        };

        let columns = [
            row.tick,
            row.susceptible,
            row.infectious,
            row.recovered,
            row.fatalities,
            row.in_treatment,
        ]
        .into_iter()
        .map(|v| {
            let mut b = UInt64Builder::new();
            b.append_value(v);
            Arc::new(b.finish()) as arrow::array::ArrayRef
        })
        .collect();

        let batch = RecordBatch::try_new(Arc::clone(&self.summ_schema), columns)?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(w) = self.snapshots.take() {
            w.close()?;
        }
        if let Some(w) = self.summaries.take() {
            w.close()?;
        }
        Ok(())
    }
}
