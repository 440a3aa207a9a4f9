//! Reproducible seeding.
//!
//! One master seed deterministically derives a seed per random source, so a
//! run can be replayed from a single number.
//!
//! The built-in interpolation models are deterministic and take no seed;
//! for them the master seed is only reported. Backends implementing
//! [`SuperResolver`](crate::model::SuperResolver) outside this crate draw
//! their generators from [`Seeds::general_rng`], [`Seeds::numeric_rng`] and
//! [`Seeds::framework_rng`].

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Range a seed is drawn from when none is configured.
pub const RANDOM_SEED_RANGE: std::ops::RangeInclusive<u64> = 1..=10000;

/// Seeds for every random source of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seeds {
    /// The master seed everything else is derived from.
    pub master: u64,
    /// General-purpose randomness (sampling, shuffling).
    pub general: u64,
    /// Numeric array generation (noise, degradations).
    pub numeric: u64,
    /// Model backend initialisation.
    pub framework: u64,
}

impl Seeds {
    /// Derive all sub-seeds from `master`.
    #[must_use]
    pub fn from_seed(master: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(master);
        Self {
            master,
            general: rng.next_u64(),
            numeric: rng.next_u64(),
            framework: rng.next_u64(),
        }
    }

    /// Use the configured seed, or draw one from [`RANDOM_SEED_RANGE`].
    #[must_use]
    pub fn resolve(configured: Option<u64>) -> Self {
        let master = configured.unwrap_or_else(|| rand::thread_rng().gen_range(RANDOM_SEED_RANGE));
        info!(seed = master, "random seed");
        Self::from_seed(master)
    }

    /// Generator for general-purpose randomness.
    #[must_use]
    pub fn general_rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.general)
    }

    /// Generator for numeric array randomness.
    #[must_use]
    pub fn numeric_rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.numeric)
    }

    /// Generator handed to the model backend.
    #[must_use]
    pub fn framework_rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.framework)
    }
}
