//! Least-mean-squares adaptive filter
//!
//! ```text
//! y[n]  = Σ w[k] * x[n-k]
//! e[n]  = d[n] - y[n]
//! w[k] += mu * e[n] * x[n-k]
//! ```
//!
//! Stability needs `mu` small relative to the input power (roughly
//! `mu < 2 / (N * P_x)`). This is not checked at runtime; an oversized step
//! size shows up as growing or non-finite outputs.

use super::delay_line::DelayLine;
use super::AdaptiveFilter;
use crate::error::{DspError, Result};

/// Stochastic-gradient adaptive FIR
#[derive(Debug, Clone)]
pub struct LmsFilter {
    weights: Vec<f64>,
    history: DelayLine,

    /// Step size
    mu: f64,

    last_error: f64,
}

impl LmsFilter {
    /// Create an LMS filter with all weights at zero
    ///
    /// # Errors
    /// `InvalidLength` if `length == 0`, `InvalidParameter` unless `mu > 0`
    pub fn new(length: usize, mu: f64) -> Result<Self> {
        Self::with_weights(vec![0.0; length], mu)
    }

    /// Create an LMS filter starting from pre-trained weights
    pub fn with_weights(weights: Vec<f64>, mu: f64) -> Result<Self> {
        if weights.is_empty() {
            return Err(DspError::length("LMS filter", "need at least one tap"));
        }
        // also rejects NaN
        if !(mu > 0.0) {
            return Err(DspError::parameter("mu", mu, "step size must be positive"));
        }

        let history = DelayLine::new(weights.len())?;
        tracing::debug!(taps = weights.len(), mu, "LMS filter created");

        Ok(Self {
            weights,
            history,
            mu,
            last_error: 0.0,
        })
    }

    /// Filter one sample and adapt towards `desired`
    #[inline]
    pub fn process_sample(&mut self, input: f64, desired: f64) -> f64 {
        self.history.push(input);
        let output = self.history.dot(&self.weights);

        let error = desired - output;
        let step = self.mu * error;
        for (w, x) in self.weights.iter_mut().zip(self.history.iter_newest()) {
            *w += step * x;
        }

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

    /// Zero weights and history
    pub fn reset(&mut self) {
        self.weights.fill(0.0);
        self.history.reset();
        self.last_error = 0.0;
    }

    /// Stop adapting; the weights stay as they are (step size becomes 0)
    pub fn freeze(&mut self) {
        self.mu = 0.0;
    }

    pub fn is_frozen(&self) -> bool {
        self.mu == 0.0
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn history(&self) -> &DelayLine {
        &self.history
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Error `d - y` of the most recent sample
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

impl AdaptiveFilter for LmsFilter {
    fn process(&mut self, input: f64, desired: f64) -> f64 {
        self.process_sample(input, desired)
    }

    fn weights(&self) -> &[f64] {
        &self.weights
    }

    fn reset(&mut self) {
        LmsFilter::reset(self)
    }
}
