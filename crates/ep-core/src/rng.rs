//! Deterministic simulation-level RNG.
//!
//! Every simulation instance owns exactly one `SimRng`, seeded from
//! `EpidemicConfig::seed`, and passes it explicitly to each phase.  There is
//! no global random state: two `Sim`s with the same seed and configuration
//! produce identical runs, and independent `Sim`s never share a generator.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Per-simulation random source.
///
/// Used only in the single-threaded parts of a tick; the parallel neighbour
/// count pass draws no random numbers.
#[derive(Debug)]
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    /// For `f64` this is U[0, 1).
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Draw from Normal(`mean`, `std_dev`).
    ///
    /// A non-finite or negative `std_dev` degenerates to `mean`.
    #[inline]
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        match Normal::new(mean, std_dev) {
            Ok(dist) => dist.sample(&mut self.0),
            Err(_) => mean,
        }
    }
}
