//! FFT-based fast convolution for long FIR filters
//!
//! Overlap-add with frequency-domain multiplication, O(N log N) per block
//! instead of O(N*M). Output matches [`FirFilter`](super::FirFilter) sample
//! for sample up to rounding.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use super::Filter;
use crate::error::{DspError, Result};

/// Block FIR filter for long impulse responses
pub struct FastFirFilter {
    /// Filter coefficients in frequency domain
    h_fft: Vec<Complex<f64>>,

    fft_size: usize,

    /// Largest block handled by one FFT pass
    block_size: usize,

    filter_length: usize,

    /// Convolution tail carried into the next block (filter_length - 1)
    tail: Vec<f64>,

    fft: Arc<dyn Fft<f64>>,
    ifft: Arc<dyn Fft<f64>>,

    /// Reusable frequency-domain work buffer
    work: Vec<Complex<f64>>,
}

impl FastFirFilter {
    /// Create new FFT-based filter
    ///
    /// # Arguments
    /// * `coefficients` - Filter coefficients h[n]
    /// * `block_size` - Input block size (e.g., 1024)
    ///
    /// FFT size is the next power of 2 >= block_size + filter_length - 1.
    pub fn new(coefficients: Vec<f64>, block_size: usize) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(DspError::length("FIR coefficients", "need at least one tap"));
        }
        if block_size == 0 {
            return Err(DspError::length("FFT block", "block size must be positive"));
        }

        let filter_length = coefficients.len();
        let fft_size = (block_size + filter_length - 1).next_power_of_two();

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let ifft = planner.plan_fft_inverse(fft_size);

        let mut h_fft = vec![Complex::new(0.0, 0.0); fft_size];
        for (slot, &coeff) in h_fft.iter_mut().zip(&coefficients) {
            *slot = Complex::new(coeff, 0.0);
        }
        fft.process(&mut h_fft);

        tracing::debug!(taps = filter_length, block_size, fft_size, "fast FIR filter created");

        Ok(Self {
            h_fft,
            fft_size,
            block_size,
            filter_length,
            tail: vec![0.0; filter_length - 1],
            fft,
            ifft,
            work: vec![Complex::new(0.0, 0.0); fft_size],
        })
    }

    /// Process a block of any length
    ///
    /// Inputs longer than `block_size` are split into `block_size` chunks.
    pub fn process_block(&mut self, input: &[f64]) -> Vec<f64> {
        let mut output = Vec::with_capacity(input.len());
        for chunk in input.chunks(self.block_size) {
            self.process_chunk(chunk, &mut output);
        }
        output
    }

    /// Process a block in-place
    pub fn process_block_inplace(&mut self, buffer: &mut [f64]) {
        let output = self.process_block(buffer);
        buffer.copy_from_slice(&output);
    }

    fn process_chunk(&mut self, chunk: &[f64], output: &mut Vec<f64>) {
        let n = chunk.len();

        for (slot, &x) in self.work.iter_mut().zip(chunk) {
            *slot = Complex::new(x, 0.0);
        }
        self.work[n..].fill(Complex::new(0.0, 0.0));

        self.fft.process(&mut self.work);
        for (w, h) in self.work.iter_mut().zip(&self.h_fft) {
            *w *= h;
        }
        self.ifft.process(&mut self.work);

        // IFFT normalization
        let scale = 1.0 / self.fft_size as f64;
        let conv = |i: usize| self.work[i].re * scale;

        for i in 0..n {
            let carried = self.tail.get(i).copied().unwrap_or(0.0);
            output.push(conv(i) + carried);
        }

        // Shift the unconsumed tail forward and add this block's overhang
        let tail_len = self.tail.len();
        self.tail.copy_within(n.min(tail_len).., 0);
        self.tail[tail_len.saturating_sub(n)..].fill(0.0);
        for (j, slot) in self.tail.iter_mut().enumerate() {
            *slot += self.work[n + j].re * scale;
        }
    }

    /// Reset filter state
    pub fn reset(&mut self) {
        self.tail.fill(0.0);
    }

    pub fn filter_length(&self) -> usize {
        self.filter_length
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }
}

impl Filter for FastFirFilter {
    /// Single-sample path, one FFT pass per sample; prefer `process_block`
    fn process(&mut self, input: f64) -> f64 {
        let mut out = Vec::with_capacity(1);
        self.process_chunk(&[input], &mut out);
        out[0]
    }

    fn reset(&mut self) {
        FastFirFilter::reset(self)
    }

    fn process_block_inplace(&mut self, buffer: &mut [f64]) {
        FastFirFilter::process_block_inplace(self, buffer)
    }
}
