//! Random sources for the simulator.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform samples in `[0, 1)`.
pub trait RandomSource: Send {
    fn next_f64(&mut self) -> f64;

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize {
        ((self.next_f64() * len as f64) as usize).min(len.saturating_sub(1))
    }
}

/// Pseudo-random samples from [`StdRng`].
pub struct SystemRandom {
    rng: StdRng,
}

impl SystemRandom {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for SystemRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays fixed samples in order, cycling when exhausted. An empty script
/// behaves like `constant(0.0)`.
///
/// Lets tests force either side of every probability branch.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    samples: VecDeque<f64>,
}

impl ScriptedRandom {
    pub fn new(samples: impl IntoIterator<Item = f64>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
        }
    }

    /// Always returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new([value])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        let value = self.samples.pop_front().unwrap_or(0.0);
        self.samples.push_back(value);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_cycles_through_samples() {
        let mut rng = ScriptedRandom::new([0.1, 0.9]);
        assert_eq!(rng.next_f64(), 0.1);
        assert_eq!(rng.next_f64(), 0.9);
        assert_eq!(rng.next_f64(), 0.1);
    }

    #[test]
    fn empty_script_yields_zero() {
        let mut rng = ScriptedRandom::new(Vec::new());
        assert_eq!(rng.next_f64(), 0.0);
        assert!(rng.chance(0.3));
        assert_eq!(rng.pick(3), 0);
    }

    #[test]
    fn pick_stays_in_bounds() {
        let mut rng = ScriptedRandom::new([0.0, 0.5, 0.999_999]);
        assert_eq!(rng.pick(3), 0);
        assert_eq!(rng.pick(3), 1);
        assert_eq!(rng.pick(3), 2);
    }

    #[test]
    fn seeded_sources_repeat() {
        let mut a = SystemRandom::seeded(7);
        let mut b = SystemRandom::seeded(7);
        for _ in 0..10 {
            let sample = a.next_f64();
            assert!((0.0..1.0).contains(&sample));
            assert_eq!(sample, b.next_f64());
        }
    }
}
