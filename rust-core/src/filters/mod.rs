//! Streaming filters: fixed FIR/IIR and adaptive LMS/RLS

pub mod delay_line;
pub mod design;
pub mod fast_fir;
pub mod fir;
pub mod iir;
pub mod lms;
pub mod matrix;
pub mod rls;

pub use delay_line::DelayLine;
pub use design::{design_bandpass, design_highpass, design_lowpass, WindowType};
pub use fast_fir::FastFirFilter;
pub use fir::FirFilter;
pub use iir::{Biquad, IirCascade};
pub use lms::LmsFilter;
pub use matrix::SquareMatrix;
pub use rls::RlsFilter;

/// Fixed (non-adaptive) single-input filter
///
/// `process` must be called in stream order; it never fails.
pub trait Filter {
    fn process(&mut self, input: f64) -> f64;

    fn reset(&mut self);

    /// Process block in-place
    fn process_block_inplace(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}

/// Filter that adapts its weights towards a desired signal
pub trait AdaptiveFilter {
    /// Filter `input`, then adapt using the error `desired - output`
    fn process(&mut self, input: f64, desired: f64) -> f64;

    fn weights(&self) -> &[f64];

    fn reset(&mut self);
}
