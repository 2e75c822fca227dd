//! Phase-accumulator carrier oscillator
//!
//! Phase-continuous across calls. The phase is kept in [0, 2π] by one
//! conditional subtraction per sample once it exceeds 2π.

use std::f64::consts::TAU;

use crate::sample::ComplexSample;

/// Numerically controlled oscillator producing e^{jθ}
#[derive(Debug, Clone)]
pub struct PhaseAccumulator {
    phase: f64,
    phase_inc: f64,
}

impl PhaseAccumulator {
    /// Start at phase 0 advancing `phase_inc` radians per sample
    pub fn new(phase_inc: f64) -> Self {
        Self {
            phase: 0.0,
            phase_inc,
        }
    }

    /// Current phasor e^{jθ}, then advance θ
    #[inline]
    pub fn next_phasor(&mut self) -> ComplexSample {
        let (sin, cos) = self.phase.sin_cos();
        self.advance();
        ComplexSample::new(cos, sin)
    }

    #[inline]
    fn advance(&mut self) {
        self.phase += self.phase_inc;
        if self.phase > TAU {
            self.phase -= TAU;
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn phase_increment(&self) -> f64 {
        self.phase_inc
    }
}
