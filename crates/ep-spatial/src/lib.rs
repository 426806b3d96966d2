//! `ep-spatial` — proximity search over agent positions.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`index`]   | `ProximityIndex`, an R-tree over a subset of agents        |
//! | [`query`]   | `NeighborKind`, `Neighborhoods` (healthy / infected split)  |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! Indexes are rebuilt from the current `AgentTable` snapshot at the start of
//! each infection pass; they never observe writes made during that pass.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod index;
pub mod query;


pub use error::{SpatialError, SpatialResult};
pub use index::ProximityIndex;
pub use query::{NeighborKind, Neighborhoods};
