//! Lockdown speed policy.
//!
//! While active, every speed is capped at the configured ceiling and
//! compliant agents stand still.  Who complies is drawn once, when the
//! lockdown switches on, and forgotten when it switches off.

use ep_agent::AgentTable;
use ep_core::SimRng;
use tracing::info;

/// Per-simulation lockdown state.  `None` while inactive.
#[derive(Clone, Debug, Default)]
pub struct LockdownState {
    compliant: Option<Vec<bool>>,
}

impl LockdownState {
    /// `true` once the current or historical-peak infected count has reached
    /// `threshold` head-counts.
    #[inline]
    pub fn triggered(current_infected: usize, peak_infected: usize, threshold: f64) -> bool {
        current_infected as f64 >= threshold || peak_infected as f64 >= threshold
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.compliant.is_some()
    }

    /// Compliance flags, if active.
    pub fn compliance(&self) -> Option<&[bool]> {
        self.compliant.as_deref()
    }

    /// Switch on (drawing compliance: agent `i` complies when `U[0,1) <
    /// compliance`) or off.  Returns `true` when the state changed.
    pub fn set_active(
        &mut self,
        active:     bool,
        pop_size:   usize,
        compliance: f64,
        rng:        &mut SimRng,
    ) -> bool {
        match (active, self.is_active()) {
            (true, false) => {
                let flags: Vec<bool> = (0..pop_size).map(|_| rng.random::<f64>() < compliance).collect();
                let complying = flags.iter().filter(|&&c| c).count();
                info!(complying, pop_size, "lockdown activated");
                self.compliant = Some(flags);
                true
            }
            (false, true) => {
                info!("lockdown lifted");
                self.compliant = None;
                true
            }
            _ => false,
        }
    }

    /// Cap every speed at `ceiling` and stop compliant agents.  No-op while
    /// inactive.
    pub fn apply(&self, table: &mut AgentTable, ceiling: f64) {
        let Some(compliant) = &self.compliant else {
            return;
        };
        for (speed, &complies) in table.speed.iter_mut().zip(compliant) {
            *speed = if complies { 0.0 } else { speed.min(ceiling) };
        }
    }
}
