//! Random sampling primitives consumed by the shift sampler.
//!
//! Sampling is expressed as a trait so that callers can inject a seeded
//! generator (or a scripted one in tests) and get reproducible augmentation.

use rand::{Rng, RngExt};

/// A source of the two distributions the augmentation pipeline draws from.
pub trait Sampler {
    /// Draws a sample uniformly from `[0, 1)`.
    fn sample_uniform(&mut self) -> f64;

    /// Draws from a two-sided (Laplace) exponential distribution centered at 0.
    ///
    /// The magnitude is exponential with rate `lambda`; the sign is positive
    /// or negative with equal probability. Larger `lambda` concentrates
    /// samples near 0.
    fn sample_exp_two_sided(&mut self, lambda: f64) -> f64 {
        let sign = if self.sample_uniform() < 0.5 { 1.0 } else { -1.0 };
        // 1 - u lies in (0, 1], keeping ln finite.
        let u = 1.0 - self.sample_uniform();
        sign * (-u.ln() / lambda)
    }
}

impl<R: Rng + ?Sized> Sampler for R {
    fn sample_uniform(&mut self) -> f64 {
        self.random::<f64>()
    }
}
