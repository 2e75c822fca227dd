//! Filter benchmark and QPSK loopback
//!
//! Run with: cargo run --release --bin filter-bench -- --coeffs filter_coefficients.txt

use std::f64::consts::TAU;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use streamfilt::filters::design_lowpass;
use streamfilt::harness::{run_suite, FilterUnderTest, HarnessConfig, SuiteReport};
use streamfilt::metrics::bit_error_rate;
use streamfilt::modem::QpskModulator;
use streamfilt::sample::{join_rails, split_rails};
use streamfilt::signal::{add_noise_and_interference, random_bits, seeded_rng};
use streamfilt::{
    demodulate, CoefficientFile, FirFilter, IirCascade, LmsFilter, QpskParams, Result, RlsFilter,
    WindowType,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Benchmark streaming filters and run a QPSK loopback", long_about = None)]
struct Args {
    /// Coefficient file with FIR, SOS and optional LMS/RLS sections
    #[arg(short, long)]
    coeffs: Option<PathBuf>,

    /// Length of the noise-reduction signals in samples
    #[arg(short = 'n', long, default_value_t = 5000)]
    samples: usize,

    /// Seed for noise and random bits
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Log filter directive, overridden by RUST_LOG
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Number of bits sent through the loopback
    #[arg(long, default_value_t = 2000)]
    bits: usize,

    /// Noise power added on each rail of the loopback channel
    #[arg(long, default_value_t = 0.01)]
    noise_power: f64,
}

const LMS_TAPS: usize = 32;
const LMS_MU: f64 = 0.01;
const RLS_TAPS: usize = 16;
const RLS_LAMBDA: f64 = 0.99;
const RLS_DELTA: f64 = 0.1;

/// Filters loaded from a file or designed on the spot
struct FilterSet {
    fir: FirFilter,
    iir: IirCascade,
    lms: LmsFilter,
    rls: RlsFilter,
}

impl FilterSet {
    fn load(path: &Path, config: &HarnessConfig) -> Result<Self> {
        let file = CoefficientFile::load(path)?;
        let set = Self::from_file(&file, config)?;

        tracing::info!(
            path = %path.display(),
            fir_taps = set.fir.len(),
            sections = set.iir.num_sections(),
            "loaded coefficients"
        );
        Ok(set)
    }

    /// FIR taps are required; every other filter falls back to its
    /// designed default when its section is missing or unusable
    fn from_file(file: &CoefficientFile, config: &HarnessConfig) -> Result<Self> {
        let fir = FirFilter::new(file.fir_coefficients()?)?;

        let iir = match file.sos_sections().and_then(|rows| IirCascade::from_sos(&rows)) {
            Ok(iir) => iir,
            Err(err) => {
                tracing::warn!(%err, "no usable SOS sections, using designed IIR");
                IirCascade::from_sos(&[butterworth_section(100.0, config.sample_rate)])?
            }
        };

        let lms = match file.adaptive_weights("LMS") {
            Ok(weights) => LmsFilter::with_weights(weights, LMS_MU)?,
            Err(err) => {
                tracing::warn!(%err, "no LMS weights, starting from zero");
                LmsFilter::new(LMS_TAPS, LMS_MU)?
            }
        };
        let rls = match file.adaptive_weights("RLS") {
            Ok(weights) => RlsFilter::with_weights(weights, RLS_LAMBDA, RLS_DELTA)?,
            Err(err) => {
                tracing::warn!(%err, "no RLS weights, starting from zero");
                RlsFilter::new(RLS_TAPS, RLS_LAMBDA, RLS_DELTA)?
            }
        };

        Ok(Self { fir, iir, lms, rls })
    }

    fn designed(config: &HarnessConfig) -> Result<Self> {
        // 100 Hz lowpass at the harness rate
        let cutoff = 100.0 / (config.sample_rate / 2.0);
        let fir = FirFilter::new(design_lowpass(cutoff, 63, WindowType::Hamming)?)?;
        let iir = IirCascade::from_sos(&[butterworth_section(100.0, config.sample_rate)])?;

        Ok(Self {
            fir,
            iir,
            lms: LmsFilter::new(LMS_TAPS, LMS_MU)?,
            rls: RlsFilter::new(RLS_TAPS, RLS_LAMBDA, RLS_DELTA)?,
        })
    }
}

/// Second-order Butterworth lowpass by the bilinear transform
fn butterworth_section(cutoff: f64, sample_rate: f64) -> [f64; 6] {
    let w0 = TAU * cutoff / sample_rate;
    let alpha = w0.sin() / std::f64::consts::SQRT_2;
    let cos_w0 = w0.cos();
    let b1 = 1.0 - cos_w0;

    [b1 / 2.0, b1, b1 / 2.0, 1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha]
}

fn print_report(name: &str, report: &SuiteReport) {
    println!(
        "{:<6} {:>12.0} samples/s  {:>9.3} ms  mse {:>10.6}  gain {:>7.4}  non-finite {}",
        name,
        report.throughput.samples_per_second,
        report.throughput.processing_time.as_secs_f64() * 1000.0,
        report.noise_reduction.mse.unwrap_or(f64::NAN),
        report.tone_response.gain.unwrap_or(f64::NAN),
        report.noise_reduction.non_finite,
    );
}

/// Modulate random bits, pass them through the FIR on both rails with
/// channel noise, demodulate with the FIR group delay and return the BER
fn qpsk_loopback(args: &Args) -> Result<f64> {
    let params = QpskParams::default();
    let mut rng = seeded_rng(args.seed);
    let bits = random_bits(args.bits & !1, &mut rng);

    let mut modulator = QpskModulator::new(params)?;
    let mut signal = modulator.modulate(&bits)?;
    add_noise_and_interference(
        &mut signal,
        args.noise_power,
        0.0,
        0.0,
        params.sample_rate,
        &mut rng,
    );

    // passband lowpass, wide enough to keep the carrier and its sidebands
    let cutoff = (params.center_freq + params.symbol_rate() * 2.0) / (params.sample_rate / 2.0);
    let mut fir_i = FirFilter::new(design_lowpass(cutoff.min(0.95), 31, WindowType::Hamming)?)?;
    let mut fir_q = fir_i.clone();
    let delay = fir_i.group_delay_samples().round() as usize;

    let (mut re, mut im) = split_rails(&signal);
    // flush tail so the delayed signal still covers every symbol
    re.resize(re.len() + delay, 0.0);
    im.resize(im.len() + delay, 0.0);
    fir_i.process_block_inplace(&mut re);
    fir_q.process_block_inplace(&mut im);
    let filtered = join_rails(&re, &im);

    let demodulated = demodulate(&filtered, &params, delay)?;
    let ber = bit_error_rate(&bits, &demodulated.bits[..bits.len()])?;
    tracing::info!(bits = bits.len(), delay, ber, "QPSK loopback complete");
    Ok(ber)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = HarnessConfig {
        seed: args.seed,
        duration: args.samples as f64 / HarnessConfig::default().sample_rate,
        ..HarnessConfig::default()
    };

    let mut set = match &args.coeffs {
        Some(path) => FilterSet::load(path, &config)?,
        None => {
            tracing::info!("no coefficient file, using designed filters");
            FilterSet::designed(&config)?
        }
    };

    println!("Filter benchmark ({} samples at {} Hz)", args.samples, config.sample_rate);
    let fir = run_suite("FIR", &mut FilterUnderTest::Fixed(&mut set.fir), &config)?;
    print_report("FIR", &fir);
    let iir = run_suite("IIR", &mut FilterUnderTest::Fixed(&mut set.iir), &config)?;
    print_report("IIR", &iir);
    let lms = run_suite("LMS", &mut FilterUnderTest::Adaptive(&mut set.lms), &config)?;
    print_report("LMS", &lms);
    let rls = run_suite("RLS", &mut FilterUnderTest::Adaptive(&mut set.rls), &config)?;
    print_report("RLS", &rls);

    let ber = qpsk_loopback(&args)?;
    println!("QPSK loopback: {} bits, BER {:.6}", args.bits & !1, ber);

    Ok(())
}
