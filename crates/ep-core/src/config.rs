//! Simulation configuration.
//!
//! `EpidemicConfig` is the single read-only parameter set consumed by every
//! engine phase.  Defaults reproduce the reference behaviour; scenario presets
//! (`with_lockdown`, `with_self_isolation`, `with_reduced_interaction`) layer
//! the classic interventions on top.
//!
//! With the `serde` feature every field is optional in the serialized form:
//! missing keys fall back to [`EpidemicConfig::default`], so a JSON file only
//! needs to list what it changes.

use crate::{Bounds, EpError, EpResult};

// ── RiskIncrease ──────────────────────────────────────────────────────────────

/// Shape of the mortality curve between `risk_age` and `critical_age`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RiskIncrease {
    Linear,
    /// Power-law curve (exponent 15): rises slowly, then sharply near
    /// `critical_age`.
    #[default]
    Quadratic,
}

// ── EpidemicConfig ────────────────────────────────────────────────────────────

/// Every named parameter the engine reads.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EpidemicConfig {
    // ── Run control ───────────────────────────────────────────────────────
    /// Tick budget.
    pub simulation_steps: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Stop early once no agent is infected (only after 500 ticks).
    pub end_if_no_infections: bool,

    /// Emit an agent snapshot every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,

    /// Log a per-tick line with infection, recovery and death counts at `info`
    /// level.  Id lists are always available at `debug`.
    pub verbose: bool,

    /// Tick at which agent 0 is infected.  `None` disables the patient-zero
    /// seed (seed infections manually through `SimBuilder`).
    pub patient_zero_tick: Option<u64>,

    // ── World ─────────────────────────────────────────────────────────────
    /// `[min, max]` of the roaming area on the x axis.
    pub x_bounds: [f64; 2],

    /// `[min, max]` of the roaming area on the y axis.
    pub y_bounds: [f64; 2],

    // ── Population ────────────────────────────────────────────────────────
    pub pop_size: usize,
    pub mean_age: u32,
    pub max_age: u32,

    // ── Age risk ──────────────────────────────────────────────────────────
    pub age_dependent_risk: bool,
    /// Age at which mortality starts to rise.
    pub risk_age: u32,
    /// Age at which mortality reaches `critical_mortality_chance`.
    pub critical_age: u32,
    pub critical_mortality_chance: f64,
    pub risk_increase: RiskIncrease,

    // ── Motion ────────────────────────────────────────────────────────────
    /// Mean agent speed (world units per tick).
    pub speed: f64,
    /// Multiplier on the wander half-extent while holding arrived agents.
    pub wander_factor: f64,
    /// Multiplier on the wander half-extent that counts as "arrived".
    pub wander_factor_dest: f64,
    pub heading_update_chance: f64,
    pub speed_update_chance: f64,
    pub heading_multiplication: f64,
    pub speed_multiplication: f64,

    // ── Infection ─────────────────────────────────────────────────────────
    /// Half-width of the square infection zone around an agent.
    pub infection_range: f64,
    /// Per-contact, per-tick transmission probability.
    pub infection_chance: f64,
    /// `(min, max)` illness duration in ticks driving recovery progress.
    pub recovery_duration: (u64, u64),
    pub mortality_chance: f64,
    /// Whether infected agents on their way to a destination still infect.
    pub traveling_infects: bool,

    // ── Healthcare ────────────────────────────────────────────────────────
    /// Maximum number of concurrently treated agents.
    pub healthcare_capacity: usize,
    pub treatment_factor: f64,
    pub no_treatment_factor: f64,
    pub treatment_dependent_risk: bool,

    // ── Self-isolation ────────────────────────────────────────────────────
    pub self_isolate: bool,
    /// Probability a treated, newly infected agent is sent to isolation.
    pub self_isolate_proportion: f64,
    /// `[min_x, min_y, max_x, max_y]` of the isolation ward.
    pub isolation_bounds: [f64; 4],

    // ── Lockdown ──────────────────────────────────────────────────────────
    pub lockdown: bool,
    /// Infected fraction that triggers the lockdown.
    pub lockdown_percentage: f64,
    /// Fraction of the population that stays put during lockdown.
    pub lockdown_compliance: f64,
    /// Speed ceiling applied to everyone during lockdown.
    pub lockdown_speed_ceiling: f64,

    // ── Tracking ──────────────────────────────────────────────────────────
    /// Count immune agents as susceptible in the tracker.
    ///
    /// Defaults to `false`: immune agents are never infected again, so
    /// counting them as susceptible would overstate the population at risk.
    /// Only the tracker's susceptible series reads this flag.
    pub reinfect: bool,
}

impl Default for EpidemicConfig {
    fn default() -> Self {
        Self {
            simulation_steps:      10_000,
            seed:                  42,
            end_if_no_infections:  true,
            output_interval_ticks: 10,
            verbose:               true,
            patient_zero_tick:     Some(50),

            // 2 × 2 world with a 0.02 plotting margin.
            x_bounds: [0.02, 1.98],
            y_bounds: [0.02, 1.98],

            pop_size: 2_000,
            mean_age: 10,
            max_age:  105,

            age_dependent_risk:        true,
            risk_age:                  55,
            critical_age:              75,
            critical_mortality_chance: 0.1,
            risk_increase:             RiskIncrease::Quadratic,

            speed:                  0.01,
            wander_factor:          1.0,
            wander_factor_dest:     1.5,
            heading_update_chance:  0.02,
            speed_update_chance:    0.02,
            heading_multiplication: 1.0,
            speed_multiplication:   1.0,

            infection_range:   0.01,
            infection_chance:  0.03,
            recovery_duration: (200, 500),
            mortality_chance:  0.02,
            traveling_infects: false,

            healthcare_capacity:      300,
            treatment_factor:         0.5,
            no_treatment_factor:      3.0,
            treatment_dependent_risk: true,

            self_isolate:            false,
            self_isolate_proportion: 0.6,
            isolation_bounds:        [0.02, 0.02, 0.1, 0.98],

            lockdown:               false,
            lockdown_percentage:    0.1,
            lockdown_compliance:    0.95,
            lockdown_speed_ceiling: 0.001,

            reinfect: false,
        }
    }
}

impl EpidemicConfig {
    /// The roaming area as a [`Bounds`].
    #[inline]
    pub fn world_bounds(&self) -> Bounds {
        Bounds::from_axes(self.x_bounds, self.y_bounds)
    }

    /// The isolation ward as a [`Bounds`].
    #[inline]
    pub fn isolation_area(&self) -> Bounds {
        Bounds::from_corners(self.isolation_bounds)
    }

    /// Infected head-count at which the lockdown triggers.
    #[inline]
    pub fn lockdown_threshold(&self) -> f64 {
        self.pop_size as f64 * self.lockdown_percentage
    }

    // ── Scenario presets ──────────────────────────────────────────────────

    /// Enable the lockdown policy.
    pub fn with_lockdown(mut self, lockdown_percentage: f64, lockdown_compliance: f64) -> Self {
        self.lockdown = true;
        self.lockdown_percentage = lockdown_percentage;
        self.lockdown_compliance = lockdown_compliance;
        self
    }

    /// Enable self-isolation.  The roaming area moves right so the isolation
    /// ward on the left edge stays separate from the free population.
    pub fn with_self_isolation(
        mut self,
        self_isolate_proportion: f64,
        isolation_bounds: [f64; 4],
        traveling_infects: bool,
    ) -> Self {
        self.self_isolate = true;
        self.self_isolate_proportion = self_isolate_proportion;
        self.isolation_bounds = isolation_bounds;
        self.x_bounds = [0.1, 1.1];
        self.y_bounds = [0.02, 0.98];
        self.traveling_infects = traveling_infects;
        self
    }

    /// Lower the mean speed to model reduced interaction.
    pub fn with_reduced_interaction(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    // ── Validation ────────────────────────────────────────────────────────

    /// Reject parameter sets the engine cannot run with.
    ///
    /// The quadratic risk curve is only accepted for
    /// `0 < mortality_chance < critical_mortality_chance`.  The closed-form
    /// fit still evaluates outside that range, but it then yields a curve that
    /// falls with age (or divides by zero when the two chances are equal), so
    /// such configurations are refused rather than run.  The linear curve
    /// accepts any pair of probabilities.
    pub fn validate(&self) -> EpResult<()> {
        if self.pop_size == 0 {
            return Err(EpError::config("pop_size must be a positive integer"));
        }
        if u32::try_from(self.pop_size).is_err() {
            return Err(EpError::config(format!(
                "pop_size {} exceeds the agent id range",
                self.pop_size
            )));
        }
        if !self.world_bounds().has_area() {
            return Err(EpError::config(format!(
                "world bounds {} have no area",
                self.world_bounds()
            )));
        }
        if self.max_age < self.mean_age {
            return Err(EpError::config(format!(
                "max_age ({}) is below mean_age ({})",
                self.max_age, self.mean_age
            )));
        }
        for (name, p) in [
            ("infection_chance", self.infection_chance),
            ("mortality_chance", self.mortality_chance),
            ("critical_mortality_chance", self.critical_mortality_chance),
            ("heading_update_chance", self.heading_update_chance),
            ("speed_update_chance", self.speed_update_chance),
            ("self_isolate_proportion", self.self_isolate_proportion),
            ("lockdown_percentage", self.lockdown_percentage),
            ("lockdown_compliance", self.lockdown_compliance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(EpError::config(format!("{name} must lie in [0, 1], got {p}")));
            }
        }
        for (name, v) in [
            ("speed", self.speed),
            ("infection_range", self.infection_range),
            ("wander_factor", self.wander_factor),
            ("wander_factor_dest", self.wander_factor_dest),
            ("treatment_factor", self.treatment_factor),
            ("no_treatment_factor", self.no_treatment_factor),
            ("lockdown_speed_ceiling", self.lockdown_speed_ceiling),
        ] {
            if !(v >= 0.0) {
                return Err(EpError::config(format!("{name} must be non-negative, got {v}")));
            }
        }
        let (min, max) = self.recovery_duration;
        if min > max {
            return Err(EpError::config(format!(
                "recovery_duration lower bound {min} exceeds upper bound {max}"
            )));
        }
        if self.age_dependent_risk {
            if self.risk_age >= self.critical_age {
                return Err(EpError::config(format!(
                    "risk_age ({}) must be below critical_age ({})",
                    self.risk_age, self.critical_age
                )));
            }
            // Narrower than the closed form: a falling curve is refused.
            if self.risk_increase == RiskIncrease::Quadratic
                && !(self.mortality_chance > 0.0
                    && self.mortality_chance < self.critical_mortality_chance)
            {
                return Err(EpError::config(
                    "quadratic risk needs 0 < mortality_chance < critical_mortality_chance",
                ));
            }
        }
        if self.self_isolate && !self.isolation_area().has_area() {
            return Err(EpError::config(format!(
                "isolation bounds {} have no area",
                self.isolation_area()
            )));
        }
        Ok(())
    }
}
