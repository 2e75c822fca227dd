//! QPSK demodulator
//!
//! Downconverts with a fresh carrier, integrates the middle half of each
//! symbol window and decides by phase sector.
//!
//! Synchronization is assumed: the caller supplies the group delay of
//! whatever sits between modulator and demodulator. The downconversion
//! carrier restarts at phase 0 at the delayed start, so a delay that is not a
//! whole number of carrier cycles leaves a constant phase rotation on every
//! constellation point. Nothing here corrects it.

use super::carrier::PhaseAccumulator;
use super::constellation::{decide, dibit_bits};
use super::params::QpskParams;
use crate::error::{DspError, Result};
use crate::sample::ComplexSample;

/// Recovered bits plus the per-symbol decision points
#[derive(Debug, Clone, PartialEq)]
pub struct Demodulated {
    /// Two bits per symbol, `b0` first
    pub bits: Vec<u8>,

    /// Averaged baseband point each decision was made from
    pub constellation: Vec<ComplexSample>,
}

impl Demodulated {
    pub fn num_bits(&self) -> usize {
        self.bits.len()
    }

    pub fn num_symbols(&self) -> usize {
        self.constellation.len()
    }
}

/// Demodulate `samples`, skipping the first `delay` of them
///
/// `delay` is clamped to `samples.len() - 1`. The number of symbols is
/// `ceil((len - delay) / samples_per_symbol)`; a trailing partial symbol is
/// decided from whatever samples it has.
pub fn demodulate(samples: &[ComplexSample], params: &QpskParams, delay: usize) -> Result<Demodulated> {
    params.validate()?;
    if samples.is_empty() {
        return Err(DspError::EmptySignal);
    }

    let delay = if delay >= samples.len() {
        tracing::warn!(delay, length = samples.len(), "delay exceeds signal, clamping");
        samples.len() - 1
    } else {
        delay
    };

    let processed = &samples[delay..];
    let baseband = downconvert(processed, params.phase_increment());

    let sps = params.samples_per_symbol;
    let num_symbols = baseband.len().div_ceil(sps);
    let mut bits = Vec::with_capacity(num_symbols * 2);
    let mut constellation = Vec::with_capacity(num_symbols);

    for i in 0..num_symbols {
        let point = integrate_symbol(&baseband, i * sps, sps);
        let (b0, b1) = dibit_bits(decide(point));
        bits.push(b0);
        bits.push(b1);
        constellation.push(point);
    }

    tracing::debug!(delay, symbols = num_symbols, "demodulated");
    Ok(Demodulated { bits, constellation })
}

/// Multiply by the conjugate carrier, starting at phase 0
fn downconvert(samples: &[ComplexSample], phase_inc: f64) -> Vec<ComplexSample> {
    let mut carrier = PhaseAccumulator::new(phase_inc);
    samples
        .iter()
        .map(|s| {
            let lo = carrier.next_phasor();
            // s · e^{-jθ}
            ComplexSample::new(s.re * lo.re + s.im * lo.im, s.im * lo.re - s.re * lo.im)
        })
        .collect()
}

/// Mean over `[start + sps/4, start + 3·sps/4)`, clipped to the signal
///
/// Falls back to the whole (possibly partial) symbol when the middle window
/// is empty, which happens for `sps < 2` or a short trailing symbol.
fn integrate_symbol(baseband: &[ComplexSample], start: usize, sps: usize) -> ComplexSample {
    let len = baseband.len();
    let mid_start = (start + sps / 4).min(len);
    let mid_end = (start + 3 * sps / 4).min(len);

    let window = if mid_start < mid_end {
        &baseband[mid_start..mid_end]
    } else {
        &baseband[start..(start + sps).min(len)]
    };

    let sum: ComplexSample = window.iter().sum();
    sum / window.len() as f64
}
