//! Age-dependent mortality.
//!
//! Below `risk_age` every agent dies with the base probability; from
//! `critical_age` on, with the critical probability.  In between the chance
//! rises either linearly or along a steep power curve.
//!
//! The power curve is `b·(x + a)^15`, fitted through `(risk_age − 1, base)`
//! and `(critical_age, critical)`.  It is evaluated on a grid of
//! `critical_age` evenly spaced points spanning `[0, critical_age]` (both ends
//! included), at grid index `age − 1`.  Grid spacing is therefore
//! `critical_age / (critical_age − 1)`, slightly above one year.

use ep_core::{EpidemicConfig, RiskIncrease};

/// Exponent of the quadratic-mode risk curve.
pub const QUADRATIC_POWER: i32 = 15;

/// Mortality probability for an agent of `age`.
///
/// Returns exactly `base` for `age <= risk_age` and exactly `critical` for
/// `age >= critical_age`, in both modes.  The quadratic mode needs
/// `0 < base < critical`; outside that it falls back to `base`.
pub fn mortality_for_age(
    age:          u32,
    base:         f64,
    risk_age:     u32,
    critical_age: u32,
    critical:     f64,
    mode:         RiskIncrease,
) -> f64 {
    if age <= risk_age {
        return base;
    }
    if age >= critical_age {
        return critical;
    }
    match mode {
        RiskIncrease::Linear => {
            let step = critical / (critical_age - risk_age + 1) as f64;
            critical - (critical_age - age) as f64 * step
        }
        RiskIncrease::Quadratic => match PowerCurve::fit(base, risk_age, critical_age, critical) {
            Some(curve) => curve.at_age(age),
            None => base,
        },
    }
}

/// Fitted constants of `b·(x + a)^15`.
struct PowerCurve {
    a: f64,
    b: f64,
    spacing: f64,
}

impl PowerCurve {
    fn fit(base: f64, risk_age: u32, critical_age: u32, critical: f64) -> Option<Self> {
        let pw = QUADRATIC_POWER as f64;
        let ratio = base / critical;
        if !(ratio > 0.0 && ratio < 1.0) || critical_age < 2 {
            return None;
        }
        let big_a = (ratio.ln() / pw).exp();
        let anchor = risk_age as f64 - 1.0;
        let a = (anchor - critical_age as f64 * big_a) / (big_a - 1.0);
        let b = base / (anchor + a).powi(QUADRATIC_POWER);
        let spacing = critical_age as f64 / (critical_age - 1) as f64;
        (a.is_finite() && b.is_finite()).then_some(Self { a, b, spacing })
    }

    #[inline]
    fn at_age(&self, age: u32) -> f64 {
        let x = (age - 1) as f64 * self.spacing;
        self.b * (x + self.a).powi(QUADRATIC_POWER)
    }
}

/// Mortality probability for every age up to `critical_age`, computed once
/// per simulation.
#[derive(Clone, Debug)]
pub struct RiskCurve {
    by_age: Vec<f64>,
    critical: f64,
}

impl RiskCurve {
    pub fn new(base: f64, risk_age: u32, critical_age: u32, critical: f64, mode: RiskIncrease) -> Self {
        let by_age = (0..critical_age)
            .map(|age| mortality_for_age(age, base, risk_age, critical_age, critical, mode))
            .collect();
        Self { by_age, critical }
    }

    pub fn from_config(config: &EpidemicConfig) -> Self {
        Self::new(
            config.mortality_chance,
            config.risk_age,
            config.critical_age,
            config.critical_mortality_chance,
            config.risk_increase,
        )
    }

    /// Same value as [`mortality_for_age`] with this curve's parameters.
    #[inline]
    pub fn mortality(&self, age: u32) -> f64 {
        self.by_age.get(age as usize).copied().unwrap_or(self.critical)
    }
}
