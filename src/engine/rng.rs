//! Deterministic randomness source for sampling passes.
//!
//! One `SampleRng` per engine instance. Given the same seed and the same
//! call sequence it reproduces the same stream, which is what makes whole
//! fingerprints reproducible: the sampler's draw sequence is a pure
//! function of the constraint set, so seed + constraints pin every value.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded pseudo-random stream shared by one engine instance.
///
/// Concurrent sampling calls against one engine must be serialized; the
/// engine enforces that by taking `&mut self` for every draw path.
#[derive(Debug)]
pub struct SampleRng {
    rng: StdRng,
}

impl SampleRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws a uniform value in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Draws from N(mean, std_dev²) via Box–Muller.
    ///
    /// Always consumes exactly two uniforms per call (the spare second
    /// variate is discarded) so the stream position stays a pure function
    /// of the call count.
    pub fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.uniform().max(f64::MIN_POSITIVE);
        let u2 = self.uniform();
        let radius = (-2.0 * u1.ln()).sqrt();
        let theta = 2.0 * std::f64::consts::PI * u2;
        mean + std_dev * radius * theta.cos()
    }

    /// Picks an index by cumulative-weight scan.
    ///
    /// Weights need not sum to exactly 1; the scan is over the actual
    /// total, so renormalization error within tolerance cannot push the
    /// draw out of range. An all-zero weight vector falls back to the last
    /// index, which callers rule out by construction.
    pub fn pick_index(&mut self, weights: &[f64]) -> usize {
        debug_assert!(!weights.is_empty());
        let total: f64 = weights.iter().sum();
        let target = self.uniform() * total;
        let mut cumulative = 0.0;
        for (i, w) in weights.iter().enumerate() {
            cumulative += w;
            if target < cumulative {
                return i;
            }
        }
        weights.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SampleRng::from_seed(42);
        let mut b = SampleRng::from_seed(42);
        for _ in 0..100 {
            assert_eq!(a.uniform().to_bits(), b.uniform().to_bits());
        }
    }

    #[test]
    fn gaussian_consumes_two_uniforms() {
        let mut a = SampleRng::from_seed(7);
        let mut b = SampleRng::from_seed(7);
        let _ = a.gaussian(0.0, 1.0);
        let _ = b.uniform();
        let _ = b.uniform();
        assert_eq!(a.uniform().to_bits(), b.uniform().to_bits());
    }

    #[test]
    fn pick_index_respects_zero_weight() {
        let mut rng = SampleRng::from_seed(1);
        for _ in 0..1000 {
            let i = rng.pick_index(&[0.0, 1.0, 0.0]);
            assert_eq!(i, 1);
        }
    }

    #[test]
    fn gaussian_centers_on_mean() {
        let mut rng = SampleRng::from_seed(9);
        let n = 20_000;
        let sum: f64 = (0..n).map(|_| rng.gaussian(10.0, 2.0)).sum();
        let mean = sum / n as f64;
        assert!((mean - 10.0).abs() < 0.1, "sample mean {mean}");
    }
}
