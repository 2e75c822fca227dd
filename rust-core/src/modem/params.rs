//! QPSK session parameters

use serde::{Deserialize, Serialize};

use crate::error::{DspError, Result};

/// Carrier and timing parameters shared by the modulator and demodulator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QpskParams {
    /// Carrier frequency (Hz)
    pub center_freq: f64,

    /// Sample rate (Hz)
    pub sample_rate: f64,

    /// Samples per symbol
    pub samples_per_symbol: usize,
}

impl Default for QpskParams {
    /// 1800 Hz carrier at 9600 Hz, 16 samples per symbol (600 baud)
    fn default() -> Self {
        Self {
            center_freq: 1800.0,
            sample_rate: 9600.0,
            samples_per_symbol: 16,
        }
    }
}

impl QpskParams {
    /// Create and validate parameters
    pub fn new(center_freq: f64, sample_rate: f64, samples_per_symbol: usize) -> Result<Self> {
        let params = Self {
            center_freq,
            sample_rate,
            samples_per_symbol,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check every field is positive and the carrier is below the sample rate
    ///
    /// The phase accumulator wraps with a single subtraction per sample, so
    /// the per-sample increment must stay below 2π.
    pub fn validate(&self) -> Result<()> {
        if !(self.sample_rate > 0.0) || !self.sample_rate.is_finite() {
            return Err(DspError::parameter("sample_rate", self.sample_rate, "must be positive and finite"));
        }
        if !(self.center_freq > 0.0) || self.center_freq >= self.sample_rate {
            return Err(DspError::parameter(
                "center_freq",
                self.center_freq,
                "must be positive and below the sample rate",
            ));
        }
        if self.samples_per_symbol == 0 {
            return Err(DspError::parameter("samples_per_symbol", 0.0, "must be at least 1"));
        }
        Ok(())
    }

    /// Carrier phase advance per sample (radians)
    pub fn phase_increment(&self) -> f64 {
        2.0 * std::f64::consts::PI * self.center_freq / self.sample_rate
    }

    pub fn symbol_rate(&self) -> f64 {
        self.sample_rate / self.samples_per_symbol as f64
    }
}
