//! Synthetic test signals
//!
//! Everything random takes an explicit RNG so runs are reproducible; use
//! [`seeded_rng`] for a deterministic ChaCha stream.

use std::f64::consts::{PI, TAU};

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::modem::PhaseAccumulator;
use crate::sample::ComplexSample;

/// Deterministic RNG for test signals
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

fn sample_count(duration: f64, sample_rate: f64) -> usize {
    (duration * sample_rate).max(0.0) as usize
}

/// `amplitude * sin(2π f t)` for `duration` seconds
pub fn sine_wave(frequency: f64, amplitude: f64, duration: f64, sample_rate: f64) -> Vec<f64> {
    (0..sample_count(duration, sample_rate))
        .map(|i| amplitude * (TAU * frequency * i as f64 / sample_rate).sin())
        .collect()
}

/// Sum of sines, one `(frequency, amplitude)` pair per tone
pub fn multi_tone(tones: &[(f64, f64)], duration: f64, sample_rate: f64) -> Vec<f64> {
    (0..sample_count(duration, sample_rate))
        .map(|i| {
            let t = i as f64 / sample_rate;
            tones.iter().map(|&(f, a)| a * (TAU * f * t).sin()).sum()
        })
        .collect()
}

/// Sine plus uniform noise in `[-noise_level, noise_level]`
pub fn noisy_sine<R: Rng>(
    frequency: f64,
    amplitude: f64,
    noise_level: f64,
    duration: f64,
    sample_rate: f64,
    rng: &mut R,
) -> Vec<f64> {
    let mut signal = sine_wave(frequency, amplitude, duration, sample_rate);
    for x in &mut signal {
        *x += rng.gen_range(-1.0..=1.0) * noise_level;
    }
    signal
}

/// Uniformly random 0/1 values
pub fn random_bits<R: Rng>(count: usize, rng: &mut R) -> Vec<u8> {
    (0..count).map(|_| rng.gen_range(0..=1u8)).collect()
}

/// Gaussian noise by the Box–Muller transform
pub struct GaussianNoise {
    std_dev: f64,

    /// Second Box–Muller output, returned on the next call
    cached: Option<f64>,
}

impl GaussianNoise {
    pub fn new(power: f64) -> Self {
        Self {
            std_dev: power.max(0.0).sqrt(),
            cached: None,
        }
    }

    pub fn next_sample<R: Rng>(&mut self, rng: &mut R) -> f64 {
        if let Some(z) = self.cached.take() {
            return z * self.std_dev;
        }

        // avoid ln(0)
        let u1: f64 = rng.gen::<f64>().max(1e-12);
        let u2: f64 = rng.gen();
        let r = (-2.0 * u1.ln()).sqrt();
        let theta = 2.0 * PI * u2;

        self.cached = Some(r * theta.sin());
        r * theta.cos() * self.std_dev
    }
}

/// Add complex Gaussian noise and a narrowband interfering tone in place
///
/// # Arguments
/// * `noise_power` - Variance of the noise on each rail
/// * `interference_freq` - Interferer frequency (Hz)
/// * `interference_power` - Interferer power; its amplitude is the square root
/// * `sample_rate` - Sample rate (Hz)
pub fn add_noise_and_interference<R: Rng>(
    samples: &mut [ComplexSample],
    noise_power: f64,
    interference_freq: f64,
    interference_power: f64,
    sample_rate: f64,
    rng: &mut R,
) {
    let mut noise = GaussianNoise::new(noise_power);
    let mut tone = PhaseAccumulator::new(TAU * interference_freq / sample_rate);
    let tone_amp = interference_power.max(0.0).sqrt();

    for s in samples.iter_mut() {
        let n = ComplexSample::new(noise.next_sample(rng), noise.next_sample(rng));
        *s += n + tone.next_phasor() * tone_amp;
    }
}
