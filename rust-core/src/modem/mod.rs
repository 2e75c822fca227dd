//! QPSK modulator/demodulator pair for exercising filters with a
//! carrier-modulated test signal

pub mod carrier;
pub mod constellation;
pub mod demodulator;
pub mod modulator;
pub mod params;

pub use carrier::PhaseAccumulator;
pub use constellation::{decide, symbol_for, QPSK_POINTS};
pub use demodulator::{demodulate, Demodulated};
pub use modulator::{modulate, QpskModulator};
pub use params::QpskParams;
