//! Fixed-coefficient FIR filter
//!
//! Direct-form convolution against a [`DelayLine`] holding the N most recent
//! inputs, O(N) per sample and allocation-free after construction.

use super::delay_line::DelayLine;
use super::Filter;
use crate::error::{DspError, Result};

/// Streaming FIR filter with immutable coefficients
#[derive(Debug, Clone)]
pub struct FirFilter {
    /// Filter coefficients h[n], h[0] multiplies the newest input
    coefficients: Vec<f64>,

    /// The N most recent inputs
    history: DelayLine,
}

impl FirFilter {
    /// Create a new FIR filter with given coefficients
    ///
    /// # Arguments
    /// * `coefficients` - Filter coefficients h[n] for n = 0..N-1
    ///
    /// # Errors
    /// `InvalidLength` if `coefficients` is empty
    pub fn new(coefficients: Vec<f64>) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(DspError::length("FIR coefficients", "need at least one tap"));
        }

        let history = DelayLine::new(coefficients.len())?;
        tracing::debug!(taps = coefficients.len(), "FIR filter created");

        Ok(Self {
            coefficients,
            history,
        })
    }

    /// Process single sample
    ///
    /// y[n] = Σ h[k] * x[n-k]
    #[inline]
    pub fn process_sample(&mut self, input: f64) -> f64 {
        self.history.push(input);
        self.history.dot(&self.coefficients)
    }

    /// Process a block of samples
    ///
    /// # Returns
    /// Filtered output samples (same length as input)
    pub fn process_block(&mut self, input: &[f64]) -> Vec<f64> {
        input.iter().map(|&x| self.process_sample(x)).collect()
    }

    /// Process a block in-place (overwrites input buffer)
    pub fn process_block_inplace(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    /// Reset filter state (clear delay line)
    pub fn reset(&mut self) {
        self.history.reset();
    }

    /// Get filter coefficients
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Input history, for inspection
    pub fn history(&self) -> &DelayLine {
        &self.history
    }

    /// Get filter length
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Group delay of a symmetric (linear-phase) design
    ///
    /// Symmetry is not enforced; for an asymmetric set this is only the
    /// centre of the tap window.
    pub fn group_delay_samples(&self) -> f64 {
        (self.coefficients.len() - 1) as f64 / 2.0
    }
}

impl Filter for FirFilter {
    fn process(&mut self, input: f64) -> f64 {
        self.process_sample(input)
    }

    fn reset(&mut self) {
        FirFilter::reset(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_coefficients_rejected() {
        assert!(matches!(
            FirFilter::new(Vec::new()),
            Err(DspError::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_fir_filter_basic() {
        // Simple 3-tap moving average: [1/3, 1/3, 1/3]
        let mut filter = FirFilter::new(vec![1.0 / 3.0; 3]).unwrap();

        // Feed impulse
        let output1 = filter.process_sample(3.0);
        let output2 = filter.process_sample(0.0);
        let output3 = filter.process_sample(0.0);
        let output4 = filter.process_sample(0.0);

        assert!((output1 - 1.0).abs() < 1e-10);
        assert!((output2 - 1.0).abs() < 1e-10);
        assert!((output3 - 1.0).abs() < 1e-10);
        assert!(output4.abs() < 1e-10);
    }

    #[test]
    fn test_identity_taps_pass_input_through() {
        let mut coeffs = vec![0.0; 8];
        coeffs[0] = 1.0;
        let mut filter = FirFilter::new(coeffs).unwrap();

        let input: Vec<f64> = (0..50).map(|i| (i as f64 * 0.37).sin() * 3.0).collect();
        let output = filter.process_block(&input);
        assert_eq!(output, input);
    }

    #[test]
    fn test_fir_filter_block_processing() {
        let mut filter = FirFilter::new(vec![0.5, 0.5]).unwrap();

        let output = filter.process_block(&[1.0, 2.0, 3.0, 4.0]);

        let expected = [0.5, 1.5, 2.5, 3.5];
        assert_eq!(output.len(), 4);
        for (o, e) in output.iter().zip(expected) {
            assert!((o - e).abs() < 1e-10);
        }
    }

    #[test]
    fn test_inplace_matches_block() {
        let coeffs = vec![0.2, -0.4, 0.7, 0.1];
        let input: Vec<f64> = (0..20).map(|i| i as f64 - 7.0).collect();

        let mut a = FirFilter::new(coeffs.clone()).unwrap();
        let mut b = FirFilter::new(coeffs).unwrap();
        let expected = a.process_block(&input);
        let mut buffer = input.clone();
        b.process_block_inplace(&mut buffer);
        assert_eq!(buffer, expected);
    }

    #[test]
    fn test_fir_filter_reset() {
        let mut filter = FirFilter::new(vec![1.0, 1.0]).unwrap();

        filter.process_sample(1.0);
        filter.process_sample(2.0);
        filter.reset();

        // Next output should be as if starting fresh
        let output = filter.process_sample(1.0);
        assert!((output - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_ring_buffer_wraparound() {
        // Tap first and fourth samples
        let mut filter = FirFilter::new(vec![1.0, 0.0, 0.0, 1.0]).unwrap();

        for x in [1.0, 2.0, 3.0, 4.0] {
            filter.process_sample(x);
        }

        // h[0]*5 + h[3]*2
        let output = filter.process_sample(5.0);
        assert!((output - 7.0).abs() < 1e-10);

        let held: Vec<f64> = filter.history().iter_oldest().collect();
        assert_eq!(held, vec![2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_group_delay() {
        let filter = FirFilter::new(vec![0.25, 0.5, 0.25]).unwrap();
        assert!((filter.group_delay_samples() - 1.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_linearity(
            coeffs in proptest::collection::vec(-2.0f64..2.0, 1..12),
            pairs in proptest::collection::vec((-10.0f64..10.0, -10.0f64..10.0), 1..64),
            alpha in -3.0f64..3.0,
            beta in -3.0f64..3.0,
        ) {
            let mut fa = FirFilter::new(coeffs.clone()).unwrap();
            let mut fb = FirFilter::new(coeffs.clone()).unwrap();
            let mut fc = FirFilter::new(coeffs).unwrap();

            for &(a, b) in &pairs {
                let ya = fa.process_sample(a);
                let yb = fb.process_sample(b);
                let yc = fc.process_sample(alpha * a + beta * b);
                prop_assert!((yc - (alpha * ya + beta * yb)).abs() < 1e-9);
            }
        }
    }
}
