//! `ep-sim` — tick loop orchestrator for the episim epidemic simulator.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.simulation_steps:
//!   ⓪ Seeds        — scheduled infections (patient zero) fire.
//!   ① Destinations — travelers steer home in, arrivals switch to holding,
//!                    arrived agents are kept inside their wander box.
//!   ② Walls        — free agents reflect off the world bounds.
//!   ③ Policy       — lockdown speed caps, or random heading/speed changes.
//!   ④ Freeze       — deceased agents stop.
//!   ⑤ Move         — positions += heading × speed.
//!   ⑥ Infect       — spread_infection (strategy picked per tick).
//!   ⑦ Resolve      — recovery or death past the recovery threshold.
//!   ⑧ Release      — immune agents drop their destination.
//!   ⑨ Record       — PopulationTracker appends one entry per series.
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`builder`]  | `SimBuilder`                                           |
//! | [`sim`]      | `Sim` (the tick loop)                                  |
//! | [`tracker`]  | `PopulationTracker`, `TickCounts`                      |
//! | [`lockdown`] | `LockdownState` (trigger rule, compliance, speed caps) |
//! | [`observer`] | `SimObserver`, `NoopObserver`                          |
//! | [`summary`]  | `RunSummary`, `StopReason`                             |
//! | [`error`]    | `SimError`, `SimResult<T>`                             |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Healthy-centric neighbour counting on Rayon.           |
//! | `serde`    | Serialize/Deserialize on summaries and counts.         |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ep_core::EpidemicConfig;
//! use ep_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(EpidemicConfig::default()).build()?;
//! let summary = sim.run(&mut NoopObserver)?;
//! println!("{summary}");
//! ```

pub mod builder;
pub mod error;
pub mod lockdown;
pub mod observer;
pub mod sim;
pub mod summary;
pub mod tracker;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use lockdown::LockdownState;
pub use observer::{NoopObserver, SimObserver};
pub use sim::{BOUNDARY_MARGIN, NO_INFECTION_GRACE_TICKS, Sim};
pub use summary::{RunSummary, StopReason};
pub use tracker::{PopulationTracker, TickCounts};
