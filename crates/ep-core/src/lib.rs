//! `ep-core` — foundational types for the `episim` epidemic simulator.
//!
//! This crate is a dependency of every other `ep-*` crate.  It has no `ep-*`
//! dependencies and minimal external ones (`rand`, `rand_distr`, `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`                                             |
//! | [`geo`]         | `Bounds`, axis-aligned rectangles in world space      |
//! | [`time`]        | `Tick`                                                |
//! | [`rng`]         | `SimRng` (per-simulation, seedable)                   |
//! | [`config`]      | `EpidemicConfig`, `RiskIncrease`                      |
//! | [`error`]       | `EpError`, `EpResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                        |
//! |---------|---------------------------------------------------------------|
//! | `serde` | `Serialize`/`Deserialize` on all public types (JSON configs). |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{EpidemicConfig, RiskIncrease};
pub use error::{EpError, EpResult};
pub use geo::Bounds;
pub use ids::AgentId;
pub use rng::SimRng;
pub use time::Tick;
