//! IIR filter as a cascade of second-order sections
//!
//! Each section runs the normalized direct form I difference equation
//!
//! ```text
//! y[n] = (b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]) / a0
//! ```
//!
//! and feeds its output to the next section.

use super::Filter;
use crate::error::{DspError, Result};

/// One second-order section with its own input/output history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biquad {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a0: f64,
    pub a1: f64,
    pub a2: f64,

    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl Biquad {
    /// Create a section, rejecting `a0 == 0` (the per-sample division)
    pub fn new(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Result<Self> {
        if a0 == 0.0 || !a0.is_finite() {
            return Err(DspError::parameter("a0", a0, "leading denominator coefficient must be finite and non-zero"));
        }

        Ok(Self {
            b0,
            b1,
            b2,
            a0,
            a1,
            a2,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        })
    }

    /// Section that leaves its input unchanged
    pub fn passthrough() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a0: 1.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    #[inline]
    pub fn process(&mut self, x: f64) -> f64 {
        let y = (self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2)
            / self.a0;

        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;

        y
    }

    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    /// Coefficients as `[b0, b1, b2, a0, a1, a2]`
    pub fn coefficients(&self) -> [f64; 6] {
        [self.b0, self.b1, self.b2, self.a0, self.a1, self.a2]
    }

    /// Current history as `(x1, x2, y1, y2)`
    pub fn state(&self) -> (f64, f64, f64, f64) {
        (self.x1, self.x2, self.y1, self.y2)
    }
}

/// Cascade of second-order sections
#[derive(Debug, Clone)]
pub struct IirCascade {
    sections: Vec<Biquad>,
}

impl IirCascade {
    /// Build a cascade from flat numerator and denominator arrays
    ///
    /// # Arguments
    /// * `b` - Numerator coefficients, `[b0, b1, b2]` per section
    /// * `a` - Denominator coefficients, `[a0, a1, a2]` per section
    ///
    /// # Errors
    /// `InvalidLength` unless both lengths are equal non-zero multiples of 3,
    /// `InvalidParameter` if any section has `a0 == 0`
    pub fn new(b: &[f64], a: &[f64]) -> Result<Self> {
        if b.len() % 3 != 0 || a.len() % 3 != 0 {
            return Err(DspError::length(
                "IIR coefficients",
                format!("b ({}) and a ({}) must be multiples of 3", b.len(), a.len()),
            ));
        }
        if b.len() != a.len() {
            return Err(DspError::length(
                "IIR coefficients",
                format!("b has {} values but a has {}", b.len(), a.len()),
            ));
        }
        if b.is_empty() {
            return Err(DspError::length("IIR coefficients", "need at least one section"));
        }

        let sections = b
            .chunks_exact(3)
            .zip(a.chunks_exact(3))
            .map(|(b, a)| Biquad::new(b[0], b[1], b[2], a[0], a[1], a[2]))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(sections = sections.len(), "IIR cascade created");
        Ok(Self { sections })
    }

    /// Build a cascade from `[b0, b1, b2, a0, a1, a2]` rows
    pub fn from_sos(rows: &[[f64; 6]]) -> Result<Self> {
        let (b, a): (Vec<[f64; 3]>, Vec<[f64; 3]>) = rows
            .iter()
            .map(|r| ([r[0], r[1], r[2]], [r[3], r[4], r[5]]))
            .unzip();
        let b: Vec<f64> = b.into_iter().flatten().collect();
        let a: Vec<f64> = a.into_iter().flatten().collect();
        Self::new(&b, &a)
    }

    /// Cascade of `count` passthrough sections, to be filled with
    /// [`set_section`](Self::set_section)
    pub fn with_sections(count: usize) -> Result<Self> {
        if count == 0 {
            return Err(DspError::length("IIR cascade", "need at least one section"));
        }
        Ok(Self {
            sections: vec![Biquad::passthrough(); count],
        })
    }

    /// Overwrite the coefficients of one section
    ///
    /// The section's history is kept.
    #[allow(clippy::too_many_arguments)]
    pub fn set_section(
        &mut self,
        index: usize,
        b0: f64,
        b1: f64,
        b2: f64,
        a0: f64,
        a1: f64,
        a2: f64,
    ) -> Result<()> {
        let count = self.sections.len();
        let fresh = Biquad::new(b0, b1, b2, a0, a1, a2)?;
        let section = self
            .sections
            .get_mut(index)
            .ok_or(DspError::SectionOutOfRange { index, count })?;

        let (x1, x2, y1, y2) = section.state();
        *section = Biquad { x1, x2, y1, y2, ..fresh };
        Ok(())
    }

    /// Run one sample through every section in order
    #[inline]
    pub fn process_sample(&mut self, input: f64) -> f64 {
        self.sections
            .iter_mut()
            .fold(input, |x, section| section.process(x))
    }

    pub fn process_block(&mut self, input: &[f64]) -> Vec<f64> {
        input.iter().map(|&x| self.process_sample(x)).collect()
    }

    pub fn reset(&mut self) {
        for section in &mut self.sections {
            section.reset();
        }
    }

    pub fn sections(&self) -> &[Biquad] {
        &self.sections
    }

    pub fn num_sections(&self) -> usize {
        self.sections.len()
    }
}

impl Filter for IirCascade {
    fn process(&mut self, input: f64) -> f64 {
        self.process_sample(input)
    }

    fn reset(&mut self) {
        IirCascade::reset(self)
    }
}
