//! Streamfilt - Streaming DSP Filters and QPSK Modem
//!
//! Sample-by-sample FIR, biquad IIR, LMS and RLS filters, a passband QPSK
//! modulator/demodulator, and the signal and benchmark tooling around them.

pub mod coeffs;
pub mod error;
pub mod filters;
pub mod harness;
pub mod metrics;
pub mod modem;
pub mod sample;
pub mod signal;

pub use coeffs::CoefficientFile;
pub use error::{DspError, Result};
pub use filters::{AdaptiveFilter, Filter, FirFilter, IirCascade, LmsFilter, RlsFilter, WindowType};
pub use modem::{demodulate, modulate, QpskParams};
pub use sample::ComplexSample;
