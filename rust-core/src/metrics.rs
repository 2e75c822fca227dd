//! Aggregate quality metrics over filter and modem outputs

use crate::error::{DspError, Result};

/// Upper bound reported by [`normalized_mse`]; diverged filters saturate here
pub const MSE_CAP: f64 = 1e6;

/// Fraction of positions where the two bit sequences differ
///
/// Empty inputs give 0.0.
pub fn bit_error_rate(original: &[u8], decoded: &[u8]) -> Result<f64> {
    if original.len() != decoded.len() {
        return Err(DspError::LengthMismatch {
            left: original.len(),
            right: decoded.len(),
        });
    }
    if original.is_empty() {
        return Ok(0.0);
    }

    let errors = original.iter().zip(decoded).filter(|(a, b)| a != b).count();
    Ok(errors as f64 / original.len() as f64)
}

/// Mean squared error normalized by the reference peak amplitude
///
/// Pairs where either side is non-finite are skipped. A near-silent
/// reference is normalized by 1.0 instead. The result is capped at
/// [`MSE_CAP`].
pub fn normalized_mse(reference: &[f64], estimate: &[f64]) -> Result<f64> {
    if reference.len() != estimate.len() {
        return Err(DspError::LengthMismatch {
            left: reference.len(),
            right: estimate.len(),
        });
    }

    let peak = reference
        .iter()
        .filter(|x| x.is_finite())
        .fold(0.0f64, |m, x| m.max(x.abs()));
    let peak = if peak < 1e-10 { 1.0 } else { peak };

    let (sum, count) = reference
        .iter()
        .zip(estimate)
        .filter(|(r, e)| r.is_finite() && e.is_finite())
        .fold((0.0, 0usize), |(sum, count), (r, e)| {
            let err = (r - e) / peak;
            (sum + err * err, count + 1)
        });

    if count == 0 {
        return Ok(0.0);
    }
    Ok((sum / count as f64).min(MSE_CAP))
}

/// Output peak divided by the input tone amplitude
pub fn peak_gain(output: &[f64], amplitude: f64) -> f64 {
    let peak = output.iter().fold(0.0f64, |m, x| m.max(x.abs()));
    peak / amplitude
}

/// Number of NaN/Inf values in a sequence
pub fn count_non_finite(values: &[f64]) -> usize {
    values.iter().filter(|x| !x.is_finite()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ber_identical_is_zero() {
        let bits = [0, 1, 1, 0, 1, 0, 0, 1];
        assert_eq!(bit_error_rate(&bits, &bits).unwrap(), 0.0);
    }

    #[test]
    fn test_ber_complement_is_one() {
        let bits = [0, 1, 1, 0, 1, 0, 0, 1];
        let flipped: Vec<u8> = bits.iter().map(|b| 1 - b).collect();
        assert_eq!(bit_error_rate(&bits, &flipped).unwrap(), 1.0);
    }

    #[test]
    fn test_ber_partial_and_errors() {
        assert_eq!(bit_error_rate(&[0, 0, 1, 1], &[0, 1, 1, 1]).unwrap(), 0.25);
        assert_eq!(bit_error_rate(&[], &[]).unwrap(), 0.0);
        assert!(matches!(bit_error_rate(&[0], &[0, 1]), Err(DspError::LengthMismatch { .. })));
    }

    #[test]
    fn test_mse_normalized_by_peak() {
        let reference = [2.0, -2.0, 0.0, 1.0];
        let estimate = [2.0, -2.0, 1.0, 1.0];
        // one error of 1/2, squared, over 4 samples
        assert!((normalized_mse(&reference, &estimate).unwrap() - 0.0625).abs() < 1e-12);
    }

    #[test]
    fn test_mse_skips_non_finite_and_caps() {
        let reference = [1.0, 1.0, 1.0];
        let estimate = [1.0, f64::NAN, 1.0];
        assert_eq!(normalized_mse(&reference, &estimate).unwrap(), 0.0);

        let huge = [1e10, 1e10, 1e10];
        assert_eq!(normalized_mse(&reference, &huge).unwrap(), MSE_CAP);
    }

    #[test]
    fn test_peak_gain() {
        assert!((peak_gain(&[0.1, -0.5, 0.25], 0.25) - 2.0).abs() < 1e-12);
        assert_eq!(count_non_finite(&[1.0, f64::INFINITY, f64::NAN]), 2);
    }
}
