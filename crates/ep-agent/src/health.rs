//! Per-agent health state.

use std::fmt;

/// Disease state of one agent.
///
/// Transitions are monotone: `Healthy → Infected → {Immune, Deceased}`.
/// Nothing ever leaves `Immune` or `Deceased`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum HealthState {
    #[default]
    Healthy = 0,
    Infected = 1,
    Immune = 2,
    Deceased = 3,
}

impl HealthState {
    /// All states in code order.
    pub const ALL: [HealthState; 4] = [
        HealthState::Healthy,
        HealthState::Infected,
        HealthState::Immune,
        HealthState::Deceased,
    ];

    /// Numeric code used by snapshot rows (`0..=3`).
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// `true` if moving from `self` to `next` respects the lifecycle.
    /// Staying in the same state is always allowed.
    pub fn can_transition_to(self, next: HealthState) -> bool {
        use HealthState::*;
        matches!(
            (self, next),
            (Healthy, Healthy)
                | (Healthy, Infected)
                | (Infected, Infected)
                | (Infected, Immune)
                | (Infected, Deceased)
                | (Immune, Immune)
                | (Deceased, Deceased)
        )
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HealthState::Healthy => "healthy",
            HealthState::Infected => "infected",
            HealthState::Immune => "immune",
            HealthState::Deceased => "deceased",
        };
        f.write_str(s)
    }
}
