// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

use std::path::PathBuf;

use shared::ChannelId;

/// Failures loading the regional channel table. Fatal to the whole run.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("channel table {} is unavailable: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed channel table {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} line {line}: {reason}", .path.display())]
    InvalidRow {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("no channels found for region {region} in {}", .path.display())]
    RegionNotFound { region: String, path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid channel number: {0}")]
    UnknownChannel(ChannelId),

    #[error("bandwidth {bandwidth_mhz} MHz not available for channel {channel} (available: {available:?})")]
    BandwidthUnavailable {
        channel: ChannelId,
        bandwidth_mhz: f64,
        available: Vec<f64>,
    },

    #[error("channel {channel} center frequency {freq_mhz} MHz cannot be tuned")]
    FrequencyOutOfRange { channel: ChannelId, freq_mhz: f64 },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Receiver failures. Recovered per channel during a scan.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeviceError {
    #[error("failed to open receiver: {0}")]
    Open(String),

    #[error("failed to tune to {freq_hz} Hz: {reason}")]
    Tune { freq_hz: u32, reason: String },

    #[error("failed to read samples: {0}")]
    Read(String),

    #[error("short read: requested {requested} samples, received {received}")]
    ShortRead { requested: usize, received: usize },

    #[error("receiver is closed")]
    Closed,
}

/// Why a single channel could not be measured.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeasureError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Acquisition(#[from] DeviceError),

    #[error("no spectrum bins within +/-{half_bandwidth_hz} Hz of the center of channel {channel}")]
    EmptyWindow {
        channel: ChannelId,
        half_bandwidth_hz: f64,
    },
}

impl MeasureError {
    /// Short name of the error class, used in skip diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            MeasureError::Config(_) => "configuration",
            MeasureError::Acquisition(_) => "acquisition",
            MeasureError::EmptyWindow { .. } => "degenerate measurement",
        }
    }
}

/// Errors that abort the whole invocation.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error("channel {channel}: {source}")]
    Measure {
        channel: ChannelId,
        #[source]
        source: MeasureError,
    },

    #[error("failed to initialise logging: {0}")]
    Logging(String),

    #[error("failed to write report: {0}")]
    Report(#[from] std::io::Error),
}
