//! Randomness for the simulated acquisition pipeline

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Source of uniform samples in `[0, 1)`
pub trait Entropy: Send + Sync {
    fn unit(&self) -> f64;
}

/// Entropy backed by a standard RNG
#[derive(Debug)]
pub struct StdEntropy {
    rng: Mutex<StdRng>,
}

impl StdEntropy {
    /// Seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible sequence
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for StdEntropy {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl Entropy for StdEntropy {
    fn unit(&self) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen::<f64>()
    }
}
