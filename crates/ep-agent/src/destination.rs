//! Per-agent destination slots.
//!
//! One row per agent (indexed by the same `AgentId` as `AgentTable`) with
//! `slot_count` slots; each slot stores a target centre `(x, y)`.  Slots are
//! 1-based to match `AgentTable::active_destination`, where 0 means "none".

use ep_core::AgentId;

/// Flat `agent × slot` table of destination centres.
#[derive(Clone, Debug)]
pub struct DestinationTable {
    count: usize,
    slots: usize,
    /// `centers[agent * slots + (slot - 1)] = [x, y]`.
    centers: Vec<[f64; 2]>,
}

impl DestinationTable {
    /// All-zero (inactive) table for `count` agents with `slots` slots each.
    pub fn new(count: usize, slots: usize) -> Self {
        Self {
            count,
            slots,
            centers: vec![[0.0, 0.0]; count * slots],
        }
    }

    /// Number of agent rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of slots per agent.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots
    }

    /// `true` if `slot` is a valid 1-based slot number.
    #[inline]
    pub fn has_slot(&self, slot: u16) -> bool {
        slot >= 1 && (slot as usize) <= self.slots
    }

    /// Centre of `slot` (1-based) for `agent`.
    #[inline]
    pub fn center(&self, agent: AgentId, slot: u16) -> (f64, f64) {
        let [x, y] = self.centers[self.offset(agent, slot)];
        (x, y)
    }

    /// Set the centre of `slot` (1-based) for `agent`.
    #[inline]
    pub fn set_center(&mut self, agent: AgentId, slot: u16, x: f64, y: f64) {
        let at = self.offset(agent, slot);
        self.centers[at] = [x, y];
    }

    /// Zero every slot of every agent.
    pub fn reset(&mut self) {
        self.centers.fill([0.0, 0.0]);
    }

    #[inline]
    fn offset(&self, agent: AgentId, slot: u16) -> usize {
        debug_assert!(self.has_slot(slot), "slot {slot} out of 1..={}", self.slots);
        agent.index() * self.slots + (slot as usize - 1)
    }
}
