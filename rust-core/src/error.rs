//! Error types shared by filter construction, modem entry points and
//! coefficient parsing
//!
//! Every failure is reported when an object is built or a batch call starts.
//! Per-sample processing has no error path.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DspError {
    #[error("Invalid length for {what}: {reason}")]
    InvalidLength { what: &'static str, reason: String },

    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Section index {index} out of range (cascade has {count} sections)")]
    SectionOutOfRange { index: usize, count: usize },

    #[error("QPSK needs an even number of bits, got {0}")]
    OddBitCount(usize),

    #[error("Bit {index} has value {value}, expected 0 or 1")]
    InvalidBit { index: usize, value: u8 },

    #[error("Cannot demodulate an empty signal")]
    EmptySignal,

    #[error("Length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("No {0} found in coefficient text")]
    MissingSection(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DspError {
    pub(crate) fn length(what: &'static str, reason: impl Into<String>) -> Self {
        DspError::InvalidLength {
            what,
            reason: reason.into(),
        }
    }

    pub(crate) fn parameter(name: &'static str, value: f64, reason: &'static str) -> Self {
        DspError::InvalidParameter { name, value, reason }
    }
}

pub type Result<T> = std::result::Result<T, DspError>;
