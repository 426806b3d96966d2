//! `ep-agent` — Structure-of-Arrays agent storage for `episim`.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`health`]      | `HealthState` and its monotone transition rule            |
//! | [`table`]       | `AgentTable` (SoA arrays keyed by `AgentId`)              |
//! | [`destination`] | `DestinationTable` (per-agent destination slot centres)   |
//! | [`builder`]     | `AgentTableBuilder`, `initialize` (random population)     |
//!
//! Every column of `AgentTable` has exactly `count` elements and the
//! `AgentId` value is the index into all of them.  There are no per-agent heap
//! objects: phase passes are straight loops over contiguous buffers.

pub mod builder;
pub mod destination;
pub mod health;
pub mod table;


pub use builder::{AgentTableBuilder, initialize};
pub use destination::DestinationTable;
pub use health::HealthState;
pub use table::{AgentTable, NO_DESTINATION};
