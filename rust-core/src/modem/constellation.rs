//! QPSK constellation (2 bits per symbol)
//!
//! Gray-coded mapping, dibit = (b0 << 1) | b1:
//! 00 → 45°  (I=+1, Q=+1) / √2
//! 01 → 135° (I=-1, Q=+1) / √2
//! 11 → 225° (I=-1, Q=-1) / √2
//! 10 → 315° (I=+1, Q=-1) / √2

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, PI};

use crate::sample::ComplexSample;

/// The four constellation points, indexed by dibit
pub const QPSK_POINTS: [ComplexSample; 4] = [
    ComplexSample::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    ComplexSample::new(-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    ComplexSample::new(FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
    ComplexSample::new(-FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
];

/// Pack two bits into a dibit index
#[inline]
pub fn dibit(b0: u8, b1: u8) -> u8 {
    ((b0 & 1) << 1) | (b1 & 1)
}

/// Unpack a dibit index into `(b0, b1)`
#[inline]
pub fn dibit_bits(dibit: u8) -> (u8, u8) {
    ((dibit >> 1) & 1, dibit & 1)
}

/// Constellation point for a dibit
#[inline]
pub fn symbol_for(dibit: u8) -> ComplexSample {
    QPSK_POINTS[(dibit & 0x03) as usize]
}

/// Hard decision by phase sector
///
/// Sectors are 90° wide, centred on the constellation angles, half-open on
/// the clockwise side: `[0, π/2) → 00`, `[π/2, π) → 01`, `[-π, -π/2) → 11`,
/// `[-π/2, 0) → 10`. The negative real axis is -π whatever the sign of the
/// zero imaginary part.
pub fn decide(point: ComplexSample) -> u8 {
    let angle = point.im.atan2(point.re);
    let angle = if angle == PI { -PI } else { angle };

    if (0.0..FRAC_PI_2).contains(&angle) {
        0b00
    } else if (FRAC_PI_2..PI).contains(&angle) {
        0b01
    } else if (-FRAC_PI_2..0.0).contains(&angle) {
        0b10
    } else {
        0b11
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_mapping() {
        let s = FRAC_1_SQRT_2;
        assert_eq!(symbol_for(dibit(0, 0)), ComplexSample::new(s, s));
        assert_eq!(symbol_for(dibit(0, 1)), ComplexSample::new(-s, s));
        assert_eq!(symbol_for(dibit(1, 0)), ComplexSample::new(s, -s));
        assert_eq!(symbol_for(dibit(1, 1)), ComplexSample::new(-s, -s));
    }

    #[test]
    fn test_decision_roundtrip() {
        for d in 0..4u8 {
            assert_eq!(decide(symbol_for(d)), d, "dibit {} roundtrip failed", d);
            assert_eq!(decide(symbol_for(d) * 0.1), d);
        }
    }

    #[test]
    fn test_unit_power() {
        for point in QPSK_POINTS {
            assert!((point.norm_sqr() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_sector_boundaries() {
        // positive real axis belongs to 00, positive imaginary axis to 01
        assert_eq!(decide(ComplexSample::new(1.0, 0.0)), 0b00);
        assert_eq!(decide(ComplexSample::new(0.0, 1.0)), 0b01);
        assert_eq!(decide(ComplexSample::new(-1.0, 0.0)), 0b11);
        assert_eq!(decide(ComplexSample::new(-1.0, -0.0)), 0b11);
        assert_eq!(decide(ComplexSample::new(-1.0, 1e-9)), 0b01);
        assert_eq!(decide(ComplexSample::new(0.0, -1.0)), 0b10);
        assert_eq!(decide(ComplexSample::new(-1.0, -1e-9)), 0b11);
    }

    #[test]
    fn test_small_rotation_tolerated() {
        let rot = ComplexSample::from_polar(1.0, 0.5);
        for d in 0..4u8 {
            assert_eq!(decide(symbol_for(d) * rot), d);
        }
    }

    #[test]
    fn test_dibit_packing() {
        for d in 0..4u8 {
            let (b0, b1) = dibit_bits(d);
            assert_eq!(dibit(b0, b1), d);
        }
    }
}
