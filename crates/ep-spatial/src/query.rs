//! Neighbourhood queries split by health partition.

use std::fmt;
use std::str::FromStr;

use ep_agent::AgentTable;
use ep_core::{AgentId, Bounds};

use crate::{ProximityIndex, SpatialError, SpatialResult};

/// Which partition of the population a neighbourhood query searches.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NeighborKind {
    Healthy,
    Infected,
}

impl FromStr for NeighborKind {
    type Err = SpatialError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "healthy" => Ok(NeighborKind::Healthy),
            "infected" => Ok(NeighborKind::Infected),
            _ => Err(SpatialError::InvalidQueryKind(s.to_owned())),
        }
    }
}

impl fmt::Display for NeighborKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NeighborKind::Healthy => "healthy",
            NeighborKind::Infected => "infected",
        })
    }
}

/// A pair of proximity indexes over the healthy and the infectious agents of
/// one snapshot.
///
/// The infected side holds whichever agents exert infection pressure, which
/// may be a subset of all infected agents (travelers can be left out).
pub struct Neighborhoods {
    healthy: ProximityIndex,
    infected: ProximityIndex,
}

impl Neighborhoods {
    pub fn build(table: &AgentTable, healthy: &[AgentId], infected: &[AgentId]) -> Self {
        Self {
            healthy: ProximityIndex::build(table, healthy),
            infected: ProximityIndex::build(table, infected),
        }
    }

    /// The index searched by `kind`.
    #[inline]
    pub fn index(&self, kind: NeighborKind) -> &ProximityIndex {
        match kind {
            NeighborKind::Healthy => &self.healthy,
            NeighborKind::Infected => &self.infected,
        }
    }

    /// Ids of `kind` agents strictly inside `zone`, ascending.
    pub fn query(&self, kind: NeighborKind, zone: &Bounds) -> Vec<AgentId> {
        self.index(kind).within_zone(zone)
    }

    /// Number of `kind` agents strictly inside `zone`.
    pub fn count(&self, kind: NeighborKind, zone: &Bounds) -> usize {
        self.index(kind).count_within(zone)
    }

    /// Like [`query`](Self::query) with the kind given by name.
    ///
    /// # Errors
    ///
    /// [`SpatialError::InvalidQueryKind`] for anything other than `healthy` or
    /// `infected`.
    pub fn query_named(&self, kind: &str, zone: &Bounds) -> SpatialResult<Vec<AgentId>> {
        let kind: NeighborKind = kind.parse()?;
        Ok(self.query(kind, zone))
    }
}
