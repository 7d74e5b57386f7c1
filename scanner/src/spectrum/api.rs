// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

// STD LIB
use std::thread;

// THIRD PARTY CRATES
use rustfft::num_complex::Complex32;
use tracing::{debug, trace};

// LOCAL CRATE
use crate::device::SampleSource;
use crate::error::DeviceError;
use crate::spectrum::{SpectrumContext, SpectrumSample};

/// Floor added before the log so empty bins stay finite (-100 dB).
const POWER_EPSILON: f64 = 1e-10;

/// Acquire `iterations` blocks from an already tuned source and return their
/// averaged, frequency-centered power spectrum in dB.
///
/// The settle delay is applied once, before the first read.
pub fn estimate_power_spectrum<S: SampleSource + ?Sized>(
    source: &mut S,
    ctx: &SpectrumContext,
) -> Result<SpectrumSample, DeviceError> {
    let n = ctx.params.num_samples;
    let iterations = ctx.params.iterations.max(1);

    if !ctx.params.settle.is_zero() {
        thread::sleep(ctx.params.settle);
    }

    let mut accumulated = vec![0f64; n];
    for i in 0..iterations {
        let mut samples = source.read_samples(n)?;
        if samples.len() != n {
            return Err(DeviceError::ShortRead {
                requested: n,
                received: samples.len(),
            });
        }
        trace!("Acquisition {}/{}: {} samples", i + 1, iterations, n);
        accumulate_power(ctx, &mut samples, &mut accumulated);
    }

    // Negative frequencies first, like numpy's fftshift.
    accumulated.rotate_right(n / 2);

    let power_db = accumulated
        .iter()
        .map(|p| 10.0 * (p / iterations as f64 + POWER_EPSILON).log10())
        .collect();
    let freq_offsets_hz = frequency_axis(source.sample_rate(), n);
    debug!("Averaged {} acquisitions into {} bins", iterations, n);

    Ok(SpectrumSample {
        freq_offsets_hz,
        power_db,
    })
}

fn accumulate_power(ctx: &SpectrumContext, samples: &mut [Complex32], accumulated: &mut [f64]) {
    ctx.fft.process(samples);
    for (acc, bin) in accumulated.iter_mut().zip(samples.iter()) {
        *acc += bin.norm_sqr() as f64;
    }
}

/// Bin offsets in Hz, computed per index so no drift accumulates.
pub fn frequency_axis(sample_rate: u32, n: usize) -> Vec<f64> {
    let rate = sample_rate as f64;
    (0..n).map(|i| -rate / 2.0 + i as f64 * rate / n as f64).collect()
}
