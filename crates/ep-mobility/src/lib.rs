//! `ep-mobility` — agent movement.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                      |
//! |-----------------|---------------------------------------------------------------|
//! | [`motion`]      | Position integration, boundary reflection, random heading/speed |
//! | [`destination`] | Destination routing, arrival detection, holding, release      |
//! | [`error`]       | `MobilityError`, `MobilityResult<T>`                          |
//!
//! # Movement model
//!
//! Each agent is in one of three states, keyed by
//! `(active_destination, arrived)` in the `AgentTable`:
//!
//! 1. **Free** (`active_destination == 0`): heading and speed change only
//!    through [`randomize_motion`] and the world-boundary reflection.
//! 2. **Traveling** (`arrived == false`): [`steer_travelers`] points the
//!    heading straight at the slot centre at [`TRAVEL_SPEED`].
//! 3. **Arrived** (`arrived == true`): [`hold_at_destination`] keeps the agent
//!    inside its wander box at a slow, damped speed.
//!
//! Free → Traveling happens in [`route_to_destination`]; Traveling → Arrived
//! in [`detect_arrivals`]; back to Free through [`release_immune`] or
//! [`reset_destinations`].

pub mod destination;
pub mod error;
pub mod motion;

#[cfg(test)]
mod tests;

pub use destination::{
    ARRIVED_SPEED, TRAVEL_SPEED, active_slots, confine_to_bounds, detect_arrivals,
    hold_at_destination, release_immune, reset_destinations, route_to_destination,
    steer_travelers,
};
pub use error::{MobilityError, MobilityResult};
pub use motion::{
    MAX_SPEED, MIN_SPEED, MotionNoise, freeze_deceased, integrate_positions, inward_heading,
    randomize_agent, randomize_motion, reflect_out_of_bounds,
};
