// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

use std::path::PathBuf;

use clap::Parser;
use shared::mhz_to_hz;

use crate::error::ConfigError;

#[derive(Parser, Debug, Clone)]
#[clap(
    name = "halowscan",
    about = "Scan 802.11ah (HaLow) channels with an SDR to find the cleanest one",
    after_help = "Examples:\n  halowscan -b 2\n  halowscan -b 4 -q\n  halowscan --all-bandwidths"
)]
pub struct Cli {
    // ── Channels ───────────────────────────────────────────────────
    /// Channel bandwidth in MHz
    #[arg(short, long, default_value = "2", value_parser = ["1", "2", "4", "8"], help_heading = "Channels")]
    pub bandwidth: String,

    /// Regulatory region code (e.g. US, EU, CN, JP, KR)
    #[arg(short, long, default_value = "US", help_heading = "Channels")]
    pub region: String,

    /// Path to the channel definitions CSV file
    #[arg(long, default_value = "halow_channels.csv", help_heading = "Channels")]
    pub channels_csv: PathBuf,

    /// Measure a single channel instead of scanning every channel
    #[arg(long, conflicts_with = "all_bandwidths", help_heading = "Channels")]
    pub channel: Option<u32>,

    /// Scan all bandwidths (1, 2, 4 and 8 MHz)
    #[arg(long, action, help_heading = "Channels")]
    pub all_bandwidths: bool,

    /// Print the channel table for the region and exit without touching the receiver
    #[arg(long, action, help_heading = "Channels")]
    pub list_channels: bool,

    // ── Receiver ───────────────────────────────────────────────────
    /// SDR sample rate in MHz
    #[arg(short, long, default_value = "2.4", help_heading = "Receiver")]
    pub sample_rate: f64,

    /// Index of the RTL-SDR device to open
    #[arg(long, default_value = "0", help_heading = "Receiver")]
    pub device_index: u32,

    /// Manual tuner gain in tenths of a dB (automatic gain when omitted)
    #[arg(long, help_heading = "Receiver")]
    pub gain: Option<i32>,

    /// Raw unsigned 8-bit IQ capture to play back instead of live sampling
    #[arg(long, group = "source", help_heading = "Receiver")]
    pub file: Option<PathBuf>,

    /// Use a simulated receiver instead of hardware
    #[arg(long, action, group = "source", help_heading = "Receiver")]
    pub simulate: bool,

    /// Seed for the simulated receiver
    #[arg(long, default_value = "0", help_heading = "Receiver")]
    pub seed: u64,

    // ── Analysis ───────────────────────────────────────────────────
    /// Samples per acquisition (FFT size, power of two)
    #[arg(long, default_value = "262144", help_heading = "Analysis")]
    pub num_samples: usize,

    /// Acquisitions averaged per channel
    #[arg(long, default_value = "3", help_heading = "Analysis")]
    pub iterations: usize,

    /// Delay after tuning before sampling, in milliseconds
    #[arg(long, default_value = "100", help_heading = "Analysis")]
    pub settle_ms: u64,

    /// Percentile of the in-band power used as the noise floor
    #[arg(long, default_value = "10", help_heading = "Analysis")]
    pub percentile: f64,

    // ── Output ─────────────────────────────────────────────────────
    /// Less verbose output
    #[arg(short, long, action, help_heading = "Output")]
    pub quiet: bool,

    // ── Logging ────────────────────────────────────────────────────
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", help_heading = "Logging")]
    pub log_level: String,

    /// Directory for log files
    #[arg(long, default_value = "./logs", help_heading = "Logging")]
    pub log_dir: String,

    /// Enable file logging (console logging always enabled)
    #[arg(long, action, help_heading = "Logging")]
    pub log_to_file: bool,
}

impl Cli {
    pub fn verbose(&self) -> bool {
        !self.quiet
    }

    pub fn bandwidth_mhz(&self) -> f64 {
        // Restricted to 1/2/4/8 by the value parser.
        self.bandwidth.parse().unwrap_or(2.0)
    }

    /// Sample rate in Hz; must be positive and fit the receiver's `u32`.
    pub fn sample_rate_hz(&self) -> Result<u32, ConfigError> {
        mhz_to_hz(self.sample_rate)
            .filter(|hz| *hz > 0)
            .ok_or_else(|| {
                ConfigError::InvalidParameter(format!(
                    "sample rate must be positive and below {} MHz, got {} MHz",
                    u32::MAX as f64 / 1e6,
                    self.sample_rate
                ))
            })
    }
}
