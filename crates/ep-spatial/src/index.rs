//! R-tree over a subset of agent positions.
//!
//! # Zone semantics
//!
//! Infection zones are axis-aligned squares and membership is *strict*: an
//! agent exactly on the edge of a zone is outside it.  The R-tree envelope
//! lookup is inclusive, so every query is followed by an open-interval filter.
//! A zone of zero width therefore never contains anything.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use ep_agent::AgentTable;
use ep_core::{AgentId, Bounds};

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: an agent's `[x, y]` position and its id.
#[derive(Clone, Debug)]
struct AgentEntry {
    point: [f64; 2],
    id: AgentId,
}

impl RTreeObject for AgentEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for AgentEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── ProximityIndex ────────────────────────────────────────────────────────────

/// Bulk-loaded R-tree over the positions of a fixed set of agents.
///
/// Built once per infection pass from a snapshot; immutable afterwards.
pub struct ProximityIndex {
    tree: RTree<AgentEntry>,
}

impl ProximityIndex {
    /// Index the current positions of `ids` in `table`.
    ///
    /// An empty `ids` slice yields an empty index; every query on it returns
    /// nothing.
    pub fn build(table: &AgentTable, ids: &[AgentId]) -> Self {
        let entries: Vec<AgentEntry> = ids
            .iter()
            .map(|&id| {
                let i = id.index();
                AgentEntry { point: [table.x[i], table.y[i]], id }
            })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    /// Number of indexed agents.
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Ids of indexed agents strictly inside `zone`, ascending.
    pub fn within_zone(&self, zone: &Bounds) -> Vec<AgentId> {
        let mut ids: Vec<AgentId> = self.matches(zone).map(|e| e.id).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of indexed agents strictly inside `zone`.
    pub fn count_within(&self, zone: &Bounds) -> usize {
        self.matches(zone).count()
    }

    fn matches<'a>(&'a self, zone: &Bounds) -> impl Iterator<Item = &'a AgentEntry> + 'a {
        let zone = *zone;
        let envelope = AABB::from_corners([zone.min_x, zone.min_y], [zone.max_x, zone.max_y]);
        self.tree
            .locate_in_envelope(&envelope)
            .filter(move |e| zone.contains_strict(e.point[0], e.point[1]))
    }
}
