//! Recursive-least-squares adaptive filter
//!
//! Maintains the exact exponentially weighted least-squares solution through
//! the Sherman–Morrison update of the inverse input covariance `P`:
//!
//! ```text
//! y     = wᵗx
//! e     = d - y
//! Px    = P·x
//! denom = λ + xᵗ·Px
//! k     = Px / denom
//! w    += k·e
//! P     = (P - k ⊗ Px) / λ
//! ```
//!
//! Each sample costs O(N²). The recursion is strictly sequential, so one
//! instance is never split across threads; scale out with one instance per
//! stream. `P` is not re-symmetrized, so very long runs with λ close to 0 can
//! drift numerically.

use super::delay_line::DelayLine;
use super::matrix::SquareMatrix;
use super::AdaptiveFilter;
use crate::error::{DspError, Result};

/// RLS adaptive FIR
#[derive(Debug, Clone)]
pub struct RlsFilter {
    weights: Vec<f64>,
    history: DelayLine,

    /// Forgetting factor λ in (0, 1]
    lambda: f64,

    /// Regularization δ > 0, P starts at I/δ
    delta: f64,

    /// Inverse covariance estimate
    p: SquareMatrix,

    // Per-sample scratch, sized once
    x: Vec<f64>,
    px: Vec<f64>,
    gain: Vec<f64>,

    last_error: f64,
}

impl RlsFilter {
    /// Create an RLS filter with zero weights and `P = I/δ`
    ///
    /// # Arguments
    /// * `length` - Number of taps N
    /// * `lambda` - Forgetting factor, `0 < λ <= 1`
    /// * `delta` - Regularization, `δ > 0`
    pub fn new(length: usize, lambda: f64, delta: f64) -> Result<Self> {
        Self::with_weights(vec![0.0; length], lambda, delta)
    }

    /// Create an RLS filter starting from pre-trained weights
    pub fn with_weights(weights: Vec<f64>, lambda: f64, delta: f64) -> Result<Self> {
        let n = weights.len();
        if n == 0 {
            return Err(DspError::length("RLS filter", "need at least one tap"));
        }
        if !(lambda > 0.0 && lambda <= 1.0) {
            return Err(DspError::parameter("lambda", lambda, "forgetting factor must be in (0, 1]"));
        }
        if !(delta > 0.0) {
            return Err(DspError::parameter("delta", delta, "regularization must be positive"));
        }

        tracing::debug!(taps = n, lambda, delta, "RLS filter created");

        Ok(Self {
            weights,
            history: DelayLine::new(n)?,
            lambda,
            delta,
            p: SquareMatrix::identity_scaled(n, 1.0 / delta),
            x: vec![0.0; n],
            px: vec![0.0; n],
            gain: vec![0.0; n],
            last_error: 0.0,
        })
    }

    /// Filter one sample and update the least-squares solution
    ///
    /// Returns the a-priori output (computed before this sample's update).
    pub fn process_sample(&mut self, input: f64, desired: f64) -> f64 {
        self.history.push(input);
        self.history.copy_newest_into(&mut self.x);

        let output: f64 = self.weights.iter().zip(&self.x).map(|(w, x)| w * x).sum();
        let error = desired - output;

        self.p.mul_vec(&self.x, &mut self.px);
        let denom = self.lambda + self.x.iter().zip(&self.px).map(|(x, px)| x * px).sum::<f64>();

        for ((k, &px), w) in self.gain.iter_mut().zip(&self.px).zip(self.weights.iter_mut()) {
            *k = px / denom;
            *w += *k * error;
        }

        self.p.rank_one_update(&self.gain, &self.px, self.lambda);

        self.last_error = error;
        output
    }

    /// Run a training pair sequence, returning the outputs
    pub fn process_block(&mut self, input: &[f64], desired: &[f64]) -> Vec<f64> {
        input
            .iter()
            .zip(desired)
            .map(|(&x, &d)| self.process_sample(x, d))
            .collect()
    }

    /// Zero weights and history, restore `P = I/δ`
    pub fn reset(&mut self) {
        let n = self.weights.len();
        self.weights.fill(0.0);
        self.history.reset();
        self.p = SquareMatrix::identity_scaled(n, 1.0 / self.delta);
        self.last_error = 0.0;
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Current inverse covariance estimate
    pub fn covariance(&self) -> &SquareMatrix {
        &self.p
    }

    pub fn history(&self) -> &DelayLine {
        &self.history
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn last_error(&self) -> f64 {
        self.last_error
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl AdaptiveFilter for RlsFilter {
    fn process(&mut self, input: f64, desired: f64) -> f64 {
        self.process_sample(input, desired)
    }

    fn weights(&self) -> &[f64] {
        &self.weights
    }

    fn reset(&mut self) {
        RlsFilter::reset(self)
    }
}
