//! Free-roaming motion: integration, reflection, and random perturbation.

use ep_agent::{AgentTable, HealthState, NO_DESTINATION};
use ep_core::{AgentId, Bounds, EpidemicConfig, SimRng};

/// Every speed is clipped into `[MIN_SPEED, MAX_SPEED]` after randomization.
pub const MIN_SPEED: f64 = 0.0001;
pub const MAX_SPEED: f64 = 0.05;

const HEADING_STD: f64 = 1.0 / 3.0;

// Inward heading after hitting a wall: |Normal(0.5, 1/6)| clipped to [0.05, 1].
const REFLECT_MEAN: f64 = 0.5;
const REFLECT_STD: f64 = 0.5 / 3.0;
const REFLECT_MIN: f64 = 0.05;
const REFLECT_MAX: f64 = 1.0;

/// Parameters of the per-tick heading/speed perturbation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MotionNoise {
    /// Per-axis probability of resampling a heading component.
    pub heading_update_chance: f64,
    /// Probability of resampling the speed.
    pub speed_update_chance: f64,
    pub heading_scale: f64,
    pub speed_scale: f64,
    /// Centre of the speed distribution; its std is `mean_speed / 3`.
    pub mean_speed: f64,
}

impl MotionNoise {
    pub fn from_config(config: &EpidemicConfig) -> Self {
        Self {
            heading_update_chance: config.heading_update_chance,
            speed_update_chance: config.speed_update_chance,
            heading_scale: config.heading_multiplication,
            speed_scale: config.speed_multiplication,
            mean_speed: config.speed,
        }
    }

    /// Resample everything, unscaled.  Used once when an agent arrives.
    pub fn full(mean_speed: f64) -> Self {
        Self {
            heading_update_chance: 1.0,
            speed_update_chance: 1.0,
            heading_scale: 1.0,
            speed_scale: 1.0,
            mean_speed,
        }
    }
}

/// Draw a heading component pointing in the direction of `sign` with
/// magnitude in `[0.05, 1]`.
#[inline]
pub fn inward_heading(rng: &mut SimRng, sign: f64) -> f64 {
    let magnitude = rng.normal(REFLECT_MEAN, REFLECT_STD).clamp(REFLECT_MIN, REFLECT_MAX);
    magnitude.copysign(sign)
}

/// `position += heading * speed` for every agent.
pub fn integrate_positions(table: &mut AgentTable) {
    for i in 0..table.count {
        table.x[i] += table.heading_x[i] * table.speed[i];
        table.y[i] += table.heading_y[i] * table.speed[i];
    }
}

/// Turn free agents that have reached a wall while still heading outward.
///
/// Agents with an active destination are left alone; their heading is owned by
/// the destination controller.  The four wall checks are independent, so an
/// agent in a corner can have both components resampled in one pass.
pub fn reflect_out_of_bounds(table: &mut AgentTable, bounds: &Bounds, rng: &mut SimRng) {
    for i in 0..table.count {
        if table.active_destination[i] != NO_DESTINATION {
            continue;
        }
        if table.x[i] <= bounds.min_x && table.heading_x[i] < 0.0 {
            table.heading_x[i] = inward_heading(rng, 1.0);
        }
        if table.x[i] >= bounds.max_x && table.heading_x[i] > 0.0 {
            table.heading_x[i] = inward_heading(rng, -1.0);
        }
        if table.y[i] <= bounds.min_y && table.heading_y[i] < 0.0 {
            table.heading_y[i] = inward_heading(rng, 1.0);
        }
        if table.y[i] >= bounds.max_y && table.heading_y[i] > 0.0 {
            table.heading_y[i] = inward_heading(rng, -1.0);
        }
    }
}

/// Randomly perturb heading and speed of every agent, then clip every speed
/// to `[MIN_SPEED, MAX_SPEED]`.
pub fn randomize_motion(table: &mut AgentTable, noise: &MotionNoise, rng: &mut SimRng) {
    for i in 0..table.count {
        perturb(table, i, noise, rng);
    }
}

/// [`randomize_motion`] for one agent.
pub fn randomize_agent(table: &mut AgentTable, agent: AgentId, noise: &MotionNoise, rng: &mut SimRng) {
    perturb(table, agent.index(), noise, rng);
}

fn perturb(table: &mut AgentTable, i: usize, noise: &MotionNoise, rng: &mut SimRng) {
    if rng.random::<f64>() < noise.heading_update_chance {
        table.heading_x[i] = rng.normal(0.0, HEADING_STD) * noise.heading_scale;
    }
    if rng.random::<f64>() < noise.heading_update_chance {
        table.heading_y[i] = rng.normal(0.0, HEADING_STD) * noise.heading_scale;
    }
    if rng.random::<f64>() < noise.speed_update_chance {
        table.speed[i] = rng.normal(noise.mean_speed, noise.mean_speed / 3.0) * noise.speed_scale;
    }
    table.speed[i] = table.speed[i].clamp(MIN_SPEED, MAX_SPEED);
}

/// Zero heading and speed of every deceased agent.
pub fn freeze_deceased(table: &mut AgentTable) {
    for i in 0..table.count {
        if table.state[i] == HealthState::Deceased {
            table.heading_x[i] = 0.0;
            table.heading_y[i] = 0.0;
            table.speed[i] = 0.0;
        }
    }
}
