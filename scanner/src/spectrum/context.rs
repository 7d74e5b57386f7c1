// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

// STD LIB
use std::sync::Arc;
use std::time::Duration;

// THIRD PARTY CRATES
use rustfft::{Fft, FftPlanner};
use tracing::info;

// LOCAL CRATE
use crate::cli::Cli;
use crate::error::ConfigError;

pub(crate) const DEFAULT_NUM_SAMPLES: usize = 256 * 1024;
pub(crate) const DEFAULT_ITERATIONS: usize = 3;
pub(crate) const DEFAULT_SETTLE: Duration = Duration::from_millis(100);
pub(crate) const DEFAULT_NOISE_PERCENTILE: f64 = 10.0;

/// Acquisition and noise-statistic policy for one scan.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectrumParams {
    /// Samples per acquisition, also the FFT size.
    pub num_samples: usize,
    /// Acquisitions averaged into one spectrum.
    pub iterations: usize,
    /// Wait after each retune before the first acquisition.
    pub settle: Duration,
    /// Percentile of the in-band power taken as the noise floor.
    pub noise_percentile: f64,
}

impl Default for SpectrumParams {
    fn default() -> Self {
        Self {
            num_samples: DEFAULT_NUM_SAMPLES,
            iterations: DEFAULT_ITERATIONS,
            settle: DEFAULT_SETTLE,
            noise_percentile: DEFAULT_NOISE_PERCENTILE,
        }
    }
}

impl SpectrumParams {
    pub fn new(args: &Cli) -> Result<Self, ConfigError> {
        let params = Self {
            num_samples: args.num_samples,
            iterations: args.iterations,
            settle: Duration::from_millis(args.settle_ms),
            noise_percentile: args.percentile,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_samples < 2 || !self.num_samples.is_power_of_two() {
            return Err(ConfigError::InvalidParameter(format!(
                "sample count must be a power of two of at least 2, got {}",
                self.num_samples
            )));
        }
        if self.iterations == 0 {
            return Err(ConfigError::InvalidParameter(
                "iteration count must be at least 1".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.noise_percentile) {
            return Err(ConfigError::InvalidParameter(format!(
                "percentile must be within 0..=100, got {}",
                self.noise_percentile
            )));
        }
        Ok(())
    }
}

/// Parameters plus the FFT plan, built once and reused for every channel.
pub struct SpectrumContext {
    pub params: SpectrumParams,
    pub fft: Arc<dyn Fft<f32>>,
}

impl SpectrumContext {
    pub fn new(params: SpectrumParams) -> Self {
        // Initialize the FFT
        let fft = FftPlanner::new().plan_fft_forward(params.num_samples);

        info!(
            "Spectrum: {} samples x {} iterations, settle {:?}, noise floor at P{}",
            params.num_samples, params.iterations, params.settle, params.noise_percentile
        );

        Self { params, fft }
    }
}
