//! Fixed-capacity delay line shared by every tapped filter
//!
//! One owned backing store and a single cursor. The cursor always points at
//! the oldest sample, which is also the slot the next push overwrites.

use crate::error::{DspError, Result};

/// Ring buffer holding the N most recent input samples
#[derive(Debug, Clone)]
pub struct DelayLine {
    /// Backing store, zero-filled until N samples have been pushed
    buffer: Vec<f64>,

    /// Index of the oldest sample (next write position)
    cursor: usize,
}

impl DelayLine {
    /// Create a zero-filled delay line of `len` samples
    pub fn new(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(DspError::length("delay line", "must hold at least one sample"));
        }

        Ok(Self {
            buffer: vec![0.0; len],
            cursor: 0,
        })
    }

    /// Push a new sample, dropping the oldest one
    #[inline]
    pub fn push(&mut self, sample: f64) {
        self.buffer[self.cursor] = sample;
        self.cursor += 1;
        if self.cursor == self.buffer.len() {
            self.cursor = 0;
        }
    }

    /// Sample pushed `age` pushes ago (`0` is the newest)
    ///
    /// # Panics
    /// If `age >= len()`
    #[inline]
    pub fn newest(&self, age: usize) -> f64 {
        let len = self.buffer.len();
        assert!(age < len, "age {} outside delay line of {}", age, len);
        self.buffer[(self.cursor + len - 1 - age) % len]
    }

    /// Iterate from the newest sample back to the oldest
    #[inline]
    pub fn iter_newest(&self) -> impl Iterator<Item = f64> + '_ {
        let (older, newer) = self.buffer.split_at(self.cursor);
        older.iter().rev().chain(newer.iter().rev()).copied()
    }

    /// Iterate from the oldest sample up to the newest
    pub fn iter_oldest(&self) -> impl Iterator<Item = f64> + '_ {
        let (older, newer) = self.buffer.split_at(self.cursor);
        newer.iter().chain(older.iter()).copied()
    }

    /// Inner product of `taps` against the history, newest sample first
    ///
    /// `taps[0]` multiplies the newest sample. Extra taps beyond the delay
    /// line length are ignored.
    #[inline]
    pub fn dot(&self, taps: &[f64]) -> f64 {
        taps.iter().zip(self.iter_newest()).map(|(&t, x)| t * x).sum()
    }

    /// Copy the history into `out`, newest sample first
    pub fn copy_newest_into(&self, out: &mut [f64]) {
        for (slot, x) in out.iter_mut().zip(self.iter_newest()) {
            *slot = x;
        }
    }

    /// Zero the history and rewind the cursor
    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.cursor = 0;
    }

    /// Number of samples held
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Always false; a delay line holds at least one sample
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
