//! Intensity values (0-100) attached to synthesized features.
//!
//! The server uses [`RandomIntensity`] for visual variety; tests inject
//! [`FixedIntensity`] or [`SeededIntensity`] to get exact values.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Upper bound of the intensity scale
pub const MAX_INTENSITY: u8 = 100;

/// Source of per-feature intensity values
pub trait IntensitySource: Send + Sync {
    /// Next value in `0..=100`
    fn next_intensity(&self) -> u8;
}

/// Uniformly random intensity from the thread RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIntensity;

impl IntensitySource for RandomIntensity {
    fn next_intensity(&self) -> u8 {
        rand::thread_rng().gen_range(0..=MAX_INTENSITY)
    }
}

/// Reproducible pseudo-random sequence
pub struct SeededIntensity {
    rng: Mutex<StdRng>,
}

impl SeededIntensity {
    pub fn new(seed: u64) -> Self {
        Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }
}

impl IntensitySource for SeededIntensity {
    fn next_intensity(&self) -> u8 {
        match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(0..=MAX_INTENSITY),
            // A poisoned lock only means another caller panicked mid-draw
            Err(poisoned) => poisoned.into_inner().gen_range(0..=MAX_INTENSITY),
        }
    }
}

/// The same value every time
#[derive(Debug, Clone, Copy)]
pub struct FixedIntensity(u8);

impl FixedIntensity {
    pub fn new(value: u8) -> Self {
        Self(value.min(MAX_INTENSITY))
    }
}

impl IntensitySource for FixedIntensity {
    fn next_intensity(&self) -> u8 {
        self.0
    }
}
