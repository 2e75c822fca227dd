//! Complex sample type shared by the modem and the filters

use num_complex::Complex64;

/// One complex baseband or passband sample (`re` = in-phase, `im` = quadrature)
///
/// NaN and infinity are never rejected; use [`is_finite_sample`] to monitor
/// for numeric blow-up downstream of an unstable filter.
pub type ComplexSample = Complex64;

/// Check both rails of a sample for NaN/Inf
#[inline]
pub fn is_finite_sample(sample: &ComplexSample) -> bool {
    sample.re.is_finite() && sample.im.is_finite()
}

/// Split a complex sequence into separate I and Q rails
pub fn split_rails(samples: &[ComplexSample]) -> (Vec<f64>, Vec<f64>) {
    samples.iter().map(|s| (s.re, s.im)).unzip()
}

/// Join separate I and Q rails back into complex samples
///
/// The result is as long as the shorter rail.
pub fn join_rails(real: &[f64], imag: &[f64]) -> Vec<ComplexSample> {
    real.iter()
        .zip(imag)
        .map(|(&re, &im)| ComplexSample::new(re, im))
        .collect()
}
