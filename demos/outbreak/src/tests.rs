//! Tests for the outbreak driver.

use std::fs;
use std::sync::atomic::Ordering;

use ep_core::EpidemicConfig;
use ep_sim::{SimBuilder, StopReason};
use tempfile::TempDir;

use crate::open_output;

fn small_config() -> EpidemicConfig {
    EpidemicConfig {
        pop_size:              20,
        simulation_steps:      1_000,
        end_if_no_infections:  false,
        output_interval_ticks: 0,
        patient_zero_tick:     Some(0),
        verbose:               false,
        ..EpidemicConfig::default()
    }
}

// ── Interrupted runs ──────────────────────────────────────────────────────────

#[cfg(test)]
mod interrupt_tests {
    use super::*;

    #[test]
    fn interrupted_run_flushes_output_and_reports() {
        let mut sim = SimBuilder::new(small_config()).build().unwrap();
        let dir = TempDir::new().unwrap();
        let mut obs = open_output(Some(dir.path())).unwrap();

        sim.run_ticks(3, &mut obs).unwrap();
        sim.interrupt_handle().store(true, Ordering::Relaxed);
        let summary = sim.run(&mut obs).unwrap();

        assert_eq!(summary.stop_reason, StopReason::Interrupted);
        assert_eq!(summary.ticks_simulated, 3);
        assert!(summary.to_string().starts_with("-----stopping (interrupted)-----"));

        let output = obs.output.as_mut().unwrap();
        assert!(output.take_error().is_none());
        let text = fs::read_to_string(dir.path().join("tick_summaries.csv")).unwrap();
        // Header plus one line per simulated tick.
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn output_dir_is_created() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("nested").join("out");
        let obs = open_output(Some(dir.as_path())).unwrap();
        assert!(obs.output.is_some());
        assert!(dir.join("agent_snapshots.csv").exists());
    }

    #[test]
    fn no_output_without_dir() {
        let obs = open_output(None).unwrap();
        assert!(obs.output.is_none());
    }
}
