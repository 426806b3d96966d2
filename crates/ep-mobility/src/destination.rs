//! Destination routing: Free → Traveling → Arrived → Free.
//!
//! Passes iterate the distinct active slots (see [`active_slots`]) and select
//! the agents on each slot.  Membership tests are pure; any random draws that
//! follow are applied in ascending agent order after all slots have been
//! scanned, so the outcome does not depend on the order slots are visited.

use std::collections::BTreeSet;

use ep_agent::{AgentTable, DestinationTable, HealthState, NO_DESTINATION};
use ep_core::{AgentId, Bounds, SimRng};

use crate::motion::{MotionNoise, inward_heading, randomize_agent};
use crate::{MobilityError, MobilityResult};

/// Speed of an agent on its way to a destination.
pub const TRAVEL_SPEED: f64 = 0.02;

/// Mean speed of an agent held at its destination (std is a third of it).
pub const ARRIVED_SPEED: f64 = 0.005;

fn check_slot(destinations: &DestinationTable, slot: u16) -> MobilityResult<()> {
    if destinations.has_slot(slot) {
        Ok(())
    } else {
        Err(MobilityError::SlotOutOfRange { slot, slots: destinations.slot_count() })
    }
}

// ── Routing ───────────────────────────────────────────────────────────────────

/// Send `agent` toward the centre of `bounds` using destination `slot`.
///
/// Its wander half-extents become the half-dimensions of `bounds`.  The agent
/// is Traveling afterwards, even if it was already Arrived elsewhere.
///
/// # Errors
///
/// [`MobilityError::SlotOutOfRange`] when `slot` is 0 or above the table's
/// slot count.
pub fn route_to_destination(
    table:        &mut AgentTable,
    destinations: &mut DestinationTable,
    agent:        AgentId,
    slot:         u16,
    bounds:       &Bounds,
) -> MobilityResult<()> {
    check_slot(destinations, slot)?;
    let (cx, cy) = bounds.center();
    let (wx, wy) = bounds.half_extents();
    let i = agent.index();

    table.wander_x[i] = wx;
    table.wander_y[i] = wy;
    destinations.set_center(agent, slot, cx, cy);
    table.active_destination[i] = slot;
    table.arrived[i] = false;
    Ok(())
}

/// Put the whole population on `slot`, already arrived, confined to `bounds`.
///
/// With `teleport` every agent is first moved to a uniform random point inside
/// `bounds`; otherwise agents stay where they are and walk back into the box
/// through [`hold_at_destination`].
///
/// # Errors
///
/// [`MobilityError::SlotOutOfRange`] as for [`route_to_destination`].
pub fn confine_to_bounds(
    table:        &mut AgentTable,
    destinations: &mut DestinationTable,
    slot:         u16,
    bounds:       &Bounds,
    teleport:     bool,
    rng:          &mut SimRng,
) -> MobilityResult<()> {
    check_slot(destinations, slot)?;

    if teleport && bounds.has_area() {
        for i in 0..table.count {
            table.x[i] = rng.gen_range(bounds.min_x..bounds.max_x);
        }
        for i in 0..table.count {
            table.y[i] = rng.gen_range(bounds.min_y..bounds.max_y);
        }
    }

    let (cx, cy) = bounds.center();
    let (wx, wy) = bounds.half_extents();
    for i in 0..table.count {
        destinations.set_center(AgentId(i as u32), slot, cx, cy);
        table.wander_x[i] = wx;
        table.wander_y[i] = wy;
        table.active_destination[i] = slot;
        table.arrived[i] = true;
    }
    Ok(())
}

/// Distinct non-zero destination slots currently in use, ascending.
pub fn active_slots(table: &AgentTable) -> BTreeSet<u16> {
    table
        .active_destination
        .iter()
        .copied()
        .filter(|&d| d != NO_DESTINATION)
        .collect()
}

// ── Traveling ─────────────────────────────────────────────────────────────────

/// Point every Traveling agent at its slot centre (raw, unnormalized
/// difference) and pin its speed to [`TRAVEL_SPEED`].
pub fn steer_travelers(table: &mut AgentTable, destinations: &DestinationTable) {
    for slot in active_slots(table) {
        for i in 0..table.count {
            if table.active_destination[i] != slot || table.arrived[i] {
                continue;
            }
            let (cx, cy) = destinations.center(AgentId(i as u32), slot);
            table.heading_x[i] = cx - table.x[i];
            table.heading_y[i] = cy - table.y[i];
            table.speed[i] = TRAVEL_SPEED;
        }
    }
}

/// Mark Traveling agents within `wander × wander_factor` of their centre on
/// both axes as Arrived and give each one full motion randomization.
///
/// Returns the newly arrived ids, ascending.
pub fn detect_arrivals(
    table:         &mut AgentTable,
    destinations:  &DestinationTable,
    wander_factor: f64,
    mean_speed:    f64,
    rng:           &mut SimRng,
) -> Vec<AgentId> {
    let mut arrived = Vec::new();
    for slot in active_slots(table) {
        for i in 0..table.count {
            if table.active_destination[i] != slot || table.arrived[i] {
                continue;
            }
            let agent = AgentId(i as u32);
            let (cx, cy) = destinations.center(agent, slot);
            if (table.x[i] - cx).abs() < table.wander_x[i] * wander_factor
                && (table.y[i] - cy).abs() < table.wander_y[i] * wander_factor
            {
                arrived.push(agent);
            }
        }
    }
    arrived.sort_unstable();

    let noise = MotionNoise::full(mean_speed);
    for &agent in &arrived {
        table.arrived[agent.index()] = true;
        randomize_agent(table, agent, &noise, rng);
    }
    arrived
}

// ── Arrived ───────────────────────────────────────────────────────────────────

/// Per-axis wall an arrived agent has strayed past.  `0.0` = inside.
struct Stray {
    agent: AgentId,
    push_x: f64,
    push_y: f64,
}

/// Keep Arrived agents inside `centre ± wander × wander_factor`.
///
/// An agent beyond the box on an axis gets that heading component resampled
/// inward (same rule as the world walls).  Every Arrived agent's speed is then
/// redrawn around [`ARRIVED_SPEED`], floored at zero.
pub fn hold_at_destination(
    table:         &mut AgentTable,
    destinations:  &DestinationTable,
    wander_factor: f64,
    rng:           &mut SimRng,
) {
    let mut held = Vec::new();
    for slot in active_slots(table) {
        for i in 0..table.count {
            if table.active_destination[i] != slot || !table.arrived[i] {
                continue;
            }
            let agent = AgentId(i as u32);
            let (cx, cy) = destinations.center(agent, slot);
            let reach_x = table.wander_x[i] * wander_factor;
            let reach_y = table.wander_y[i] * wander_factor;
            held.push(Stray {
                agent,
                push_x: push_toward(table.x[i], cx, reach_x),
                push_y: push_toward(table.y[i], cy, reach_y),
            });
        }
    }
    held.sort_unstable_by_key(|s| s.agent);

    for s in held {
        let i = s.agent.index();
        if s.push_x != 0.0 {
            table.heading_x[i] = inward_heading(rng, s.push_x);
        }
        if s.push_y != 0.0 {
            table.heading_y[i] = inward_heading(rng, s.push_y);
        }
        table.speed[i] = rng.normal(ARRIVED_SPEED, ARRIVED_SPEED / 3.0).max(0.0);
    }
}

/// `-1.0` beyond the upper edge, `1.0` beyond the lower edge, else `0.0`.
#[inline]
fn push_toward(pos: f64, center: f64, reach: f64) -> f64 {
    if pos > center + reach {
        -1.0
    } else if pos < center - reach {
        1.0
    } else {
        0.0
    }
}

// ── Release ───────────────────────────────────────────────────────────────────

/// Clear the destination of the given agents, or of everyone when `ids` is
/// empty.
pub fn reset_destinations(table: &mut AgentTable, ids: &[AgentId]) {
    if ids.is_empty() {
        table.active_destination.fill(NO_DESTINATION);
        table.arrived.fill(false);
        return;
    }
    for &agent in ids {
        if table.contains(agent) {
            let i = agent.index();
            table.active_destination[i] = NO_DESTINATION;
            table.arrived[i] = false;
        }
    }
}

/// Return every Immune agent with a destination to free roaming.  Returns how
/// many were released.
pub fn release_immune(table: &mut AgentTable) -> usize {
    let mut released = 0;
    for i in 0..table.count {
        if table.state[i] == HealthState::Immune && table.active_destination[i] != NO_DESTINATION {
            table.active_destination[i] = NO_DESTINATION;
            table.arrived[i] = false;
            released += 1;
        }
    }
    released
}
