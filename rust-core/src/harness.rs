//! Benchmark harness: throughput, noise reduction and tone response
//!
//! Drives any filter sample by sample and reports timing plus a quality
//! figure. Fixed filters ignore the desired signal; adaptive filters are
//! trained on it.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::{DspError, Result};
use crate::filters::{AdaptiveFilter, Filter};
use crate::metrics::{count_non_finite, normalized_mse, peak_gain};
use crate::signal::{noisy_sine, seeded_rng, sine_wave};

/// Test-signal settings for a benchmark run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Sample rate of the synthetic signals (Hz)
    pub sample_rate: f64,

    /// Test tone frequency (Hz)
    pub tone_freq: f64,

    pub amplitude: f64,

    /// Uniform noise half-width added to the noisy signal
    pub noise_level: f64,

    /// Length of the noise-reduction signals (s)
    pub duration: f64,

    pub seed: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            sample_rate: 1000.0,
            tone_freq: 50.0,
            amplitude: 1.0,
            noise_level: 0.5,
            duration: 5.0,
            seed: 42,
        }
    }
}

/// A filter under test, fixed or adaptive
pub enum FilterUnderTest<'a> {
    Fixed(&'a mut dyn Filter),
    Adaptive(&'a mut dyn AdaptiveFilter),
}

impl FilterUnderTest<'_> {
    #[inline]
    fn process(&mut self, input: f64, desired: f64) -> f64 {
        match self {
            FilterUnderTest::Fixed(f) => f.process(input),
            FilterUnderTest::Adaptive(f) => f.process(input, desired),
        }
    }

    fn run(&mut self, input: &[f64], desired: Option<&[f64]>) -> (Vec<f64>, Duration) {
        let start = Instant::now();
        let output = match desired {
            Some(desired) => input
                .iter()
                .zip(desired)
                .map(|(&x, &d)| self.process(x, d))
                .collect(),
            None => input.iter().map(|&x| self.process(x, 0.0)).collect(),
        };
        (output, start.elapsed())
    }
}

/// Result of one measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestReport {
    pub processing_time: Duration,
    pub samples_per_second: f64,

    /// Normalized MSE against the clean reference, noise-reduction runs only
    pub mse: Option<f64>,

    /// Output peak over input amplitude, tone runs only
    pub gain: Option<f64>,

    /// NaN/Inf outputs observed
    pub non_finite: usize,
}

impl TestReport {
    fn timed(samples: usize, elapsed: Duration, output: &[f64]) -> Self {
        let secs = elapsed.as_secs_f64();
        let samples_per_second = if secs > 0.0 { samples as f64 / secs } else { f64::INFINITY };
        let non_finite = count_non_finite(output);
        if non_finite > 0 {
            tracing::warn!(non_finite, "filter produced non-finite output");
        }

        Self {
            processing_time: elapsed,
            samples_per_second,
            mse: None,
            gain: None,
            non_finite,
        }
    }
}

/// Time the filter over `signal` with a zero desired signal
pub fn measure_throughput(filter: &mut FilterUnderTest<'_>, signal: &[f64]) -> TestReport {
    let (output, elapsed) = filter.run(signal, None);
    TestReport::timed(signal.len(), elapsed, &output)
}

/// Filter `noisy` (training adaptive filters on `clean`) and score the
/// output against `clean`
pub fn measure_noise_reduction(
    filter: &mut FilterUnderTest<'_>,
    clean: &[f64],
    noisy: &[f64],
) -> Result<TestReport> {
    if clean.len() != noisy.len() {
        return Err(DspError::LengthMismatch {
            left: clean.len(),
            right: noisy.len(),
        });
    }

    let (output, elapsed) = filter.run(noisy, Some(clean));
    let mut report = TestReport::timed(noisy.len(), elapsed, &output);
    report.mse = Some(normalized_mse(clean, &output)?);
    Ok(report)
}

/// Run one second of a pure tone and report the peak gain
pub fn measure_tone_response(
    filter: &mut FilterUnderTest<'_>,
    frequency: f64,
    amplitude: f64,
    sample_rate: f64,
) -> TestReport {
    let tone = sine_wave(frequency, amplitude, 1.0, sample_rate);
    let (output, elapsed) = filter.run(&tone, None);
    let mut report = TestReport::timed(tone.len(), elapsed, &output);
    report.gain = Some(peak_gain(&output, amplitude));
    report
}

/// Throughput, noise-reduction and tone reports for one filter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
    pub throughput: TestReport,
    pub noise_reduction: TestReport,
    pub tone_response: TestReport,
}

/// Run all three measurements in sequence on the same filter instance
pub fn run_suite(
    name: &str,
    filter: &mut FilterUnderTest<'_>,
    config: &HarnessConfig,
) -> Result<SuiteReport> {
    let clean = sine_wave(config.tone_freq, config.amplitude, config.duration, config.sample_rate);
    let mut rng = seeded_rng(config.seed);
    let noisy = noisy_sine(
        config.tone_freq,
        config.amplitude,
        config.noise_level,
        config.duration,
        config.sample_rate,
        &mut rng,
    );

    let throughput = measure_throughput(filter, &noisy);
    let noise_reduction = measure_noise_reduction(filter, &clean, &noisy)?;
    let tone_response = measure_tone_response(
        filter,
        config.tone_freq,
        config.amplitude,
        config.sample_rate,
    );

    tracing::info!(
        filter = name,
        samples_per_second = throughput.samples_per_second,
        mse = ?noise_reduction.mse,
        gain = ?tone_response.gain,
        "benchmark complete"
    );

    Ok(SuiteReport {
        throughput,
        noise_reduction,
        tone_response,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{FirFilter, IirCascade, LmsFilter, RlsFilter};

    #[test]
    fn test_identity_fir_has_zero_mse() {
        let mut fir = FirFilter::new(vec![1.0]).unwrap();
        let clean = sine_wave(50.0, 1.0, 1.0, 1000.0);
        let mut under_test = FilterUnderTest::Fixed(&mut fir);

        let report = measure_noise_reduction(&mut under_test, &clean, &clean).unwrap();
        assert_eq!(report.mse, Some(0.0));
        assert_eq!(report.non_finite, 0);
    }

    #[test]
    fn test_tone_gain_of_scaling_filter() {
        let mut iir = IirCascade::new(&[0.5, 0.0, 0.0], &[1.0, 0.0, 0.0]).unwrap();
        let mut under_test = FilterUnderTest::Fixed(&mut iir);
        let report = measure_tone_response(&mut under_test, 50.0, 2.0, 1000.0);
        assert!((report.gain.unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_length_mismatch() {
        let mut fir = FirFilter::new(vec![1.0]).unwrap();
        let mut under_test = FilterUnderTest::Fixed(&mut fir);
        assert!(measure_noise_reduction(&mut under_test, &[0.0; 3], &[0.0; 4]).is_err());
    }

    #[test]
    fn test_adaptive_filters_reduce_noise() {
        let config = HarnessConfig::default();

        let mut lms = LmsFilter::new(16, 0.01).unwrap();
        let lms_report = run_suite("lms", &mut FilterUnderTest::Adaptive(&mut lms), &config).unwrap();

        let mut rls = RlsFilter::new(16, 0.99, 0.1).unwrap();
        let rls_report = run_suite("rls", &mut FilterUnderTest::Adaptive(&mut rls), &config).unwrap();

        // raw noise against the clean tone, uniform ±0.5: variance 1/12
        let raw = 1.0 / 12.0;
        assert!(lms_report.noise_reduction.mse.unwrap() < raw);
        assert!(rls_report.noise_reduction.mse.unwrap() < raw);
        assert_eq!(rls_report.throughput.non_finite, 0);
    }

    #[test]
    fn test_divergent_filter_is_reported_not_fatal() {
        let mut lms = LmsFilter::new(8, 10.0).unwrap();
        let signal: Vec<f64> = (0..2000).map(|i| ((i % 5) as f64 - 2.0) * 10.0).collect();
        let desired: Vec<f64> = signal.iter().map(|x| -x).collect();

        let mut under_test = FilterUnderTest::Adaptive(&mut lms);
        let report = measure_noise_reduction(&mut under_test, &desired, &signal).unwrap();
        assert!(report.non_finite > 0);
        assert!(report.mse.unwrap() <= crate::metrics::MSE_CAP);
    }
}
