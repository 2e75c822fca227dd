//! FIR coefficient design by the windowing method
//!
//! Frequencies are normalized to Nyquist: `1.0` is half the sample rate.
//! Lowpass designs are scaled to unit gain at DC, highpass at Nyquist and
//! bandpass at the passband centre.

use std::f64::consts::PI;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{DspError, Result};

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowType {
    /// No windowing, ~21 dB sidelobes
    Rectangular,

    /// w[n] = 0.5 - 0.5*cos(2πn/(M-1)), ~44 dB
    Hann,

    /// w[n] = 0.54 - 0.46*cos(2πn/(M-1)), ~53 dB
    Hamming,

    /// w[n] = 0.42 - 0.5*cos(2πn/(M-1)) + 0.08*cos(4πn/(M-1)), ~74 dB
    Blackman,

    /// w[n] = I0(β·sqrt(1 - (2n/(M-1) - 1)²)) / I0(β)
    Kaiser { beta: f64 },
}

impl WindowType {
    /// Filter length for a transition width (radians/sample)
    ///
    /// Based on the mainlobe widths in Oppenheim & Schafer Table 7.1. Always
    /// odd so the design is Type I linear phase. Kaiser uses the Kaiser
    /// length formula with the attenuation implied by β.
    pub fn taps_for_transition(&self, delta_omega: f64) -> usize {
        let m = match *self {
            WindowType::Rectangular => (4.0 * PI / delta_omega).ceil() as usize,
            WindowType::Hann | WindowType::Hamming => (8.0 * PI / delta_omega).ceil() as usize,
            WindowType::Blackman => (12.0 * PI / delta_omega).ceil() as usize,
            WindowType::Kaiser { beta } => {
                let atten = kaiser_attenuation(beta);
                ((atten - 8.0) / (2.285 * delta_omega)).ceil().max(1.0) as usize + 1
            }
        };

        if m % 2 == 0 {
            m + 1
        } else {
            m
        }
    }
}

/// Kaiser β for a target stopband attenuation in dB
pub fn kaiser_beta(attenuation_db: f64) -> f64 {
    if attenuation_db > 50.0 {
        0.1102 * (attenuation_db - 8.7)
    } else if attenuation_db >= 21.0 {
        0.5842 * (attenuation_db - 21.0).powf(0.4) + 0.07886 * (attenuation_db - 21.0)
    } else {
        0.0
    }
}

/// Inverse of [`kaiser_beta`] on its linear branch, good enough for sizing
fn kaiser_attenuation(beta: f64) -> f64 {
    if beta > 4.55 {
        beta / 0.1102 + 8.7
    } else {
        // below 50 dB the exact inverse has no closed form
        21.0 + beta * 6.0
    }
}

/// Zeroth-order modified Bessel function of the first kind
fn bessel_i0(x: f64) -> f64 {
    let half = x / 2.0;
    let mut term = 1.0;
    let mut sum = 1.0;
    let mut k = 1.0;
    while term > 1e-14 * sum {
        term *= (half / k) * (half / k);
        sum += term;
        k += 1.0;
    }
    sum
}

/// Generate window coefficients w[n] for n = 0..length-1
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f64> {
    if length == 1 {
        return vec![1.0];
    }

    let span = (length - 1) as f64;
    (0..length)
        .map(|n| {
            let n = n as f64;
            let angle = 2.0 * PI * n / span;
            match window_type {
                WindowType::Rectangular => 1.0,
                WindowType::Hann => 0.5 - 0.5 * angle.cos(),
                WindowType::Hamming => 0.54 - 0.46 * angle.cos(),
                WindowType::Blackman => 0.42 - 0.5 * angle.cos() + 0.08 * (2.0 * angle).cos(),
                WindowType::Kaiser { beta } => {
                    let r = 2.0 * n / span - 1.0;
                    bessel_i0(beta * (1.0 - r * r).max(0.0).sqrt()) / bessel_i0(beta)
                }
            }
        })
        .collect()
}

/// Normalized sinc: sin(πx)/(πx)
fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-12 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

fn check_cutoff(name: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(DspError::parameter(name, value, "cutoff must be in (0, 1) relative to Nyquist"))
    }
}

fn check_taps(num_taps: usize) -> Result<()> {
    if num_taps == 0 {
        Err(DspError::length("FIR design", "need at least one tap"))
    } else {
        Ok(())
    }
}

/// Window `ideal(m)` (m = offset from the centre tap) and scale to unit gain
/// at `gain_freq`
fn windowed_design(
    num_taps: usize,
    window: WindowType,
    gain_freq: f64,
    ideal: impl Fn(f64) -> f64,
) -> Vec<f64> {
    let centre = (num_taps - 1) as f64 / 2.0;
    let w = generate_window(window, num_taps);
    let mut h: Vec<f64> = (0..num_taps)
        .map(|n| ideal(n as f64 - centre) * w[n])
        .collect();

    let gain = frequency_response(&h, gain_freq).norm();
    if gain > 0.0 {
        for c in &mut h {
            *c /= gain;
        }
    }
    h
}

/// Design a lowpass FIR
///
/// # Arguments
/// * `cutoff` - -6 dB point, normalized to Nyquist
/// * `num_taps` - Filter length
/// * `window` - Window type
pub fn design_lowpass(cutoff: f64, num_taps: usize, window: WindowType) -> Result<Vec<f64>> {
    check_cutoff("cutoff", cutoff)?;
    check_taps(num_taps)?;
    Ok(windowed_design(num_taps, window, 0.0, |m| cutoff * sinc(cutoff * m)))
}

/// Design a highpass FIR (spectral inversion of the lowpass prototype)
///
/// `num_taps` must be odd; an even symmetric FIR has a zero at Nyquist.
pub fn design_highpass(cutoff: f64, num_taps: usize, window: WindowType) -> Result<Vec<f64>> {
    check_cutoff("cutoff", cutoff)?;
    check_taps(num_taps)?;
    if num_taps % 2 == 0 {
        return Err(DspError::length("highpass design", "number of taps must be odd"));
    }

    Ok(windowed_design(num_taps, window, 1.0, |m| {
        let delta = if m.abs() < 1e-12 { 1.0 } else { 0.0 };
        delta - cutoff * sinc(cutoff * m)
    }))
}

/// Design a bandpass FIR passing `[low, high]`
pub fn design_bandpass(low: f64, high: f64, num_taps: usize, window: WindowType) -> Result<Vec<f64>> {
    check_cutoff("low", low)?;
    check_cutoff("high", high)?;
    check_taps(num_taps)?;
    if low >= high {
        return Err(DspError::parameter("low", low, "lower band edge must be below the upper edge"));
    }

    Ok(windowed_design(num_taps, window, (low + high) / 2.0, |m| {
        high * sinc(high * m) - low * sinc(low * m)
    }))
}

/// Frequency response H(e^jω) at a normalized frequency (1.0 = Nyquist)
pub fn frequency_response(h: &[f64], freq: f64) -> Complex64 {
    let omega = freq * PI;
    h.iter()
        .enumerate()
        .map(|(n, &h_n)| h_n * Complex64::from_polar(1.0, -omega * n as f64))
        .sum()
}

/// Magnitude response in dB at each normalized frequency
pub fn magnitude_response_db(h: &[f64], frequencies: &[f64]) -> Vec<f64> {
    frequencies
        .iter()
        .map(|&f| 20.0 * frequency_response(h, f).norm().max(1e-12).log10())
        .collect()
}
