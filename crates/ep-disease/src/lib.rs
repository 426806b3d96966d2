//! `ep-disease` — who gets infected, and how each infection ends.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`infection`] | `spread_infection`, `InfectionStrategy`, `find_nearby`       |
//! | [`outcome`]   | `recovery_progress`, `resolve_outcomes`                      |
//! | [`risk`]      | `mortality_for_age`, `RiskCurve` (age → mortality table)     |
//! | [`error`]     | `DiseaseError`, `DiseaseResult<T>`                           |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                       |
//! |------------|--------------------------------------------------------------|
//! | `parallel` | Healthy-centric neighbour counting on Rayon's thread pool.   |

pub mod error;
pub mod infection;
pub mod outcome;
pub mod risk;


pub use error::{DiseaseError, DiseaseResult};
pub use infection::{
    ISOLATION_SLOT, InfectionReport, InfectionStrategy, find_nearby, spread_infection,
    spread_with,
};
pub use outcome::{OutcomeReport, recovery_progress, resolve_outcomes};
pub use risk::{QUADRATIC_POWER, RiskCurve, mortality_for_age};
