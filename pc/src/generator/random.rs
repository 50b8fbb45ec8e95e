//! Random source for confidence scores and reveal delays
//!
//! Injected into the session so runs are reproducible with a seed.

use std::ops::Range;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::{GenerationConfig, RevealConfig};

/// Uniform random source
pub trait RandomSource: Send {
    /// Sample in [0, 1)
    fn next_unit(&mut self) -> f64;
}

/// StdRng-backed source, seeded or from OS entropy
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        debug!(seed, "SeededRandom::new: called");
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        debug!("SeededRandom::from_entropy: called");
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seeded when a seed is given, otherwise OS entropy
    pub fn from_seed_opt(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Maps unit samples onto the configured confidence and delay ranges
pub struct Sampler {
    source: Box<dyn RandomSource>,
    confidence: Range<f64>,
    delay_ms: Range<u64>,
}

impl Sampler {
    pub fn new(source: Box<dyn RandomSource>, confidence: Range<f64>, delay_ms: Range<u64>) -> Self {
        debug!(?confidence, ?delay_ms, "Sampler::new: called");
        Self {
            source,
            confidence,
            delay_ms,
        }
    }

    /// Build a sampler from config sections
    pub fn from_config(source: Box<dyn RandomSource>, generation: &GenerationConfig, reveal: &RevealConfig) -> Self {
        Self::new(
            source,
            generation.confidence_min..generation.confidence_max,
            reveal.min_step_delay_ms..reveal.max_step_delay_ms,
        )
    }

    /// Confidence score in [min, max)
    pub fn confidence(&mut self) -> f64 {
        let Range { start, end } = self.confidence;
        let c = start + self.source.next_unit() * (end - start);
        // Rounding can land exactly on `end` for samples just below 1.0
        if c >= end { start } else { c }
    }

    /// Reveal delay in [min, max) milliseconds; an empty range yields min
    pub fn step_delay(&mut self) -> Duration {
        let Range { start, end } = self.delay_ms;
        if end <= start {
            return Duration::from_millis(start);
        }
        let offset = (self.source.next_unit() * (end - start) as f64) as u64;
        Duration::from_millis(start + offset.min(end - start - 1))
    }
}
