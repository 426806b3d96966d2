//! Fluent builder that draws a random initial population.
//!
//! # Usage
//!
//! ```rust
//! use ep_agent::AgentTableBuilder;
//! use ep_core::{Bounds, SimRng};
//!
//! let mut rng = SimRng::new(42);
//! let table = AgentTableBuilder::new(1_000)
//!     .ages(45, 105)
//!     .bounds(Bounds::from_axes([0.0, 1.0], [0.0, 1.0]))
//!     .mean_speed(0.01)
//!     .build(&mut rng)
//!     .unwrap();
//!
//! assert_eq!(table.count, 1_000);
//! ```

use ep_core::{Bounds, EpError, EpResult, SimRng};

use crate::AgentTable;

/// Agents spawn at least this far inside the world bounds.
pub const SPAWN_MARGIN: f64 = 0.05;

/// Standard deviation of the initial heading components.
const HEADING_STD: f64 = 1.0 / 3.0;

/// Recovery thresholds are drawn from Normal(0.5, 1/6).
const THRESHOLD_MEAN: f64 = 0.5;
const THRESHOLD_STD: f64 = 0.5 / 3.0;

/// Fluent builder for a randomly initialized [`AgentTable`].
pub struct AgentTableBuilder {
    count:      usize,
    mean_age:   u32,
    max_age:    u32,
    bounds:     Bounds,
    mean_speed: f64,
}

impl AgentTableBuilder {
    /// Builder for `count` agents on the unit square, mean age 45, max age
    /// 105, mean speed 0.01.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            mean_age:   45,
            max_age:    105,
            bounds:     Bounds::from_axes([0.0, 1.0], [0.0, 1.0]),
            mean_speed: 0.01,
        }
    }

    pub fn ages(mut self, mean_age: u32, max_age: u32) -> Self {
        self.mean_age = mean_age;
        self.max_age = max_age;
        self
    }

    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn mean_speed(mut self, mean_speed: f64) -> Self {
        self.mean_speed = mean_speed;
        self
    }

    /// Draw every agent's initial state from `rng`.
    ///
    /// # Errors
    ///
    /// `EpError::Config` when the population is empty, `max_age < mean_age`,
    /// or the spawn area (bounds inset by [`SPAWN_MARGIN`]) has no area.
    pub fn build(self, rng: &mut SimRng) -> EpResult<AgentTable> {
        if self.count == 0 {
            return Err(EpError::config("pop_size must be a positive integer"));
        }
        if self.max_age < self.mean_age {
            return Err(EpError::config(format!(
                "max_age ({}) is below mean_age ({})",
                self.max_age, self.mean_age
            )));
        }
        let spawn = self.bounds.inset(SPAWN_MARGIN);
        if !spawn.has_area() {
            return Err(EpError::config(format!(
                "spawn area {spawn} is empty; bounds must exceed {SPAWN_MARGIN} margin on every side"
            )));
        }

        let n = self.count;
        let mut table = AgentTable::zeroed(n);

        for i in 0..n {
            table.x[i] = rng.gen_range(spawn.min_x..spawn.max_x);
        }
        for i in 0..n {
            table.y[i] = rng.gen_range(spawn.min_y..spawn.max_y);
        }
        for i in 0..n {
            table.heading_x[i] = rng.normal(0.0, HEADING_STD);
        }
        for i in 0..n {
            table.heading_y[i] = rng.normal(0.0, HEADING_STD);
        }
        for i in 0..n {
            table.speed[i] = rng.normal(self.mean_speed, self.mean_speed / 3.0).max(0.0);
        }

        let age_std = (self.max_age - self.mean_age) as f64 / 3.0;
        for i in 0..n {
            // `as i64` truncates toward zero, matching whole-year ages.
            let drawn = rng.normal(self.mean_age as f64, age_std) as i64;
            table.age[i] = drawn.clamp(0, self.max_age as i64) as u32;
        }

        for i in 0..n {
            table.recovery_threshold[i] = rng.normal(THRESHOLD_MEAN, THRESHOLD_STD);
        }

        Ok(table)
    }
}

/// Draw a fresh population: the functional form of [`AgentTableBuilder`].
pub fn initialize(
    pop_size:   usize,
    mean_age:   u32,
    max_age:    u32,
    bounds:     Bounds,
    mean_speed: f64,
    rng:        &mut SimRng,
) -> EpResult<AgentTable> {
    AgentTableBuilder::new(pop_size)
        .ages(mean_age, max_age)
        .bounds(bounds)
        .mean_speed(mean_speed)
        .build(rng)
}
