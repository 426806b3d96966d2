//! outbreak — run one epidemic scenario from the command line.
//!
//! ```text
//! outbreak [CONFIG.json] [OUTPUT_DIR]
//! ```
//!
//! `CONFIG.json` lists only the parameters that differ from the defaults.
//! With `OUTPUT_DIR`, agent snapshots and per-tick head-counts are written as
//! CSV.  Set `RUST_LOG=debug` for per-tick infection/recovery/death ids.
//!
//! Ctrl-C stops the run after the tick in progress; output is still flushed
//! and the summary still printed.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ep_agent::AgentTable;
use ep_core::{EpidemicConfig, Tick};
use ep_output::{CsvWriter, OutputWriter, SimOutputObserver};
use ep_sim::{RunSummary, SimBuilder, SimObserver, TickCounts};

const PROGRESS_INTERVAL_TICKS: u64 = 100;

#[cfg(test)]
mod tests;

// ── Observer ──────────────────────────────────────────────────────────────────

/// Logs a progress line every [`PROGRESS_INTERVAL_TICKS`] and forwards every
/// callback to the output observer, if any.
struct Progress<W: OutputWriter> {
    output: Option<SimOutputObserver<W>>,
}

impl<W: OutputWriter> SimObserver for Progress<W> {
    fn on_tick_end(&mut self, tick: Tick, counts: &TickCounts) {
        if tick.0 % PROGRESS_INTERVAL_TICKS == 0 {
            info!(
                %tick,
                infectious = counts.infectious,
                recovered = counts.recovered,
                fatalities = counts.fatalities,
                in_treatment = counts.in_treatment,
                "progress"
            );
        }
        if let Some(out) = self.output.as_mut() {
            out.on_tick_end(tick, counts);
        }
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &AgentTable) {
        if let Some(out) = self.output.as_mut() {
            out.on_snapshot(tick, agents);
        }
    }

    fn on_sim_end(&mut self, summary: &RunSummary) {
        if let Some(out) = self.output.as_mut() {
            out.on_sim_end(summary);
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<EpidemicConfig> {
    let Some(path) = path else {
        return Ok(EpidemicConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

/// Progress logging, plus CSV output into `dir` when given.  The directory
/// is created if missing.
fn open_output(dir: Option<&Path>) -> Result<Progress<CsvWriter>> {
    let output = match dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating output dir {}", dir.display()))?;
            Some(SimOutputObserver::new(CsvWriter::new(dir)?))
        }
        None => None,
    };
    Ok(Progress { output })
}

/// Raise `flag` on Ctrl-C.
fn stop_on_ctrl_c(flag: Arc<AtomicBool>) -> Result<()> {
    ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
        .context("installing Ctrl-C handler")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().map(PathBuf::from);
    let output_dir = args.next().map(PathBuf::from);

    let config = load_config(config_path.as_deref())?;
    info!(
        pop_size = config.pop_size,
        steps = config.simulation_steps,
        seed = config.seed,
        lockdown = config.lockdown,
        self_isolate = config.self_isolate,
        "starting outbreak"
    );

    let mut sim = SimBuilder::new(config).build()?;
    let mut obs = open_output(output_dir.as_deref())?;
    stop_on_ctrl_c(sim.interrupt_handle())?;

    let t0 = Instant::now();
    let summary = sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.output.as_mut().and_then(SimOutputObserver::take_error) {
        eprintln!("output error: {e}");
    }

    println!("{summary}");
    println!("simulated in {:.3} s", elapsed.as_secs_f64());
    if let Some(dir) = output_dir {
        println!("output written to {}", dir.display());
    }
    Ok(())
}
