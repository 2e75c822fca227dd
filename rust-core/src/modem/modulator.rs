//! QPSK modulator
//!
//! Rectangular pulses: each symbol is held for `samples_per_symbol` samples
//! and rotated by the carrier phasor. No band-limiting filter is applied.

use super::carrier::PhaseAccumulator;
use super::constellation::{dibit, symbol_for};
use super::params::QpskParams;
use crate::error::{DspError, Result};
use crate::sample::ComplexSample;

/// Check a bit slice is even-length and holds only 0/1
pub(crate) fn validate_bits(bits: &[u8]) -> Result<()> {
    if bits.len() % 2 != 0 {
        return Err(DspError::OddBitCount(bits.len()));
    }
    if let Some((index, &value)) = bits.iter().enumerate().find(|&(_, &b)| b > 1) {
        return Err(DspError::InvalidBit { index, value });
    }
    Ok(())
}

/// Modulate a bit sequence starting at carrier phase 0
///
/// # Returns
/// `(bits.len() / 2) * samples_per_symbol` passband samples
pub fn modulate(bits: &[u8], params: &QpskParams) -> Result<Vec<ComplexSample>> {
    QpskModulator::new(*params)?.modulate(bits)
}

/// Modulator that keeps its carrier phase between calls
#[derive(Debug, Clone)]
pub struct QpskModulator {
    params: QpskParams,
    carrier: PhaseAccumulator,
}

impl QpskModulator {
    pub fn new(params: QpskParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            carrier: PhaseAccumulator::new(params.phase_increment()),
        })
    }

    /// Modulate `bits`, continuing from the current carrier phase
    pub fn modulate(&mut self, bits: &[u8]) -> Result<Vec<ComplexSample>> {
        validate_bits(bits)?;

        let sps = self.params.samples_per_symbol;
        let mut samples = Vec::with_capacity(bits.len() / 2 * sps);

        for pair in bits.chunks_exact(2) {
            let symbol = symbol_for(dibit(pair[0], pair[1]));
            for _ in 0..sps {
                samples.push(symbol * self.carrier.next_phasor());
            }
        }

        tracing::trace!(symbols = bits.len() / 2, samples = samples.len(), "modulated");
        Ok(samples)
    }

    /// Rewind the carrier to phase 0
    pub fn reset(&mut self) {
        self.carrier.reset();
    }

    pub fn params(&self) -> &QpskParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_1_SQRT_2;

    #[test]
    fn test_output_length() {
        let params = QpskParams::new(1000.0, 8000.0, 8).unwrap();
        let samples = modulate(&[0, 1, 1, 0, 1, 1], &params).unwrap();
        assert_eq!(samples.len(), 3 * 8);
        assert!(modulate(&[], &params).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_bad_bits() {
        let params = QpskParams::default();
        assert!(matches!(modulate(&[0, 1, 1], &params), Err(DspError::OddBitCount(3))));
        assert!(matches!(
            modulate(&[0, 2], &params),
            Err(DspError::InvalidBit { index: 1, value: 2 })
        ));
    }

    #[test]
    fn test_first_sample_is_symbol() {
        // carrier starts at phase 0 so the first sample equals the symbol
        let params = QpskParams::default();
        let samples = modulate(&[0, 1], &params).unwrap();
        assert!((samples[0].re + FRAC_1_SQRT_2).abs() < 1e-12);
        assert!((samples[0].im - FRAC_1_SQRT_2).abs() < 1e-12);
        for s in &samples {
            assert!((s.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_carrier_rotation() {
        // quarter-rate carrier: sample k is symbol * j^k
        let params = QpskParams::new(2000.0, 8000.0, 4).unwrap();
        let samples = modulate(&[0, 0], &params).unwrap();
        let symbol = symbol_for(0);
        let j = ComplexSample::new(0.0, 1.0);
        let mut rot = ComplexSample::new(1.0, 0.0);
        for s in samples {
            assert!((s - symbol * rot).norm() < 1e-9);
            rot *= j;
        }
    }

    #[test]
    fn test_stream_is_phase_continuous() {
        let params = QpskParams::new(1300.0, 8000.0, 5).unwrap();
        let bits = [0, 0, 1, 1, 0, 1, 1, 0];

        let whole = modulate(&bits, &params).unwrap();
        let mut modulator = QpskModulator::new(params).unwrap();
        let mut pieces = modulator.modulate(&bits[..4]).unwrap();
        pieces.extend(modulator.modulate(&bits[4..]).unwrap());

        assert_eq!(whole, pieces);
    }
}
