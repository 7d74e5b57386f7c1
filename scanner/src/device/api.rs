// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

// THIRD PARTY CRATES
use tracing::info;

// LOCAL CRATE
use crate::cli::Cli;
use crate::device::{RawFileSource, SampleSource, SyntheticSource};
use crate::error::DeviceError;

/// Spread of the per-channel noise levels produced by `--simulate`.
const SIMULATED_SPREAD_DB: f64 = 6.0;

/// Public API for opening the receiver selected on the command line: a file playback,
/// a simulated receiver, or the RTL-SDR.
pub fn open(args: &Cli) -> Result<Box<dyn SampleSource>, DeviceError> {
    let rate = args
        .sample_rate_hz()
        .map_err(|e| DeviceError::Open(e.to_string()))?;

    if let Some(path) = &args.file {
        return Ok(Box::new(RawFileSource::open(path, rate)?));
    }

    if args.simulate {
        info!("Using simulated receiver (seed {})", args.seed);
        return Ok(Box::new(
            SyntheticSource::new(rate, args.seed).with_random_levels(SIMULATED_SPREAD_DB),
        ));
    }

    open_rtl(args, rate)
}

#[cfg(feature = "rtlsdr")]
fn open_rtl(args: &Cli, rate: u32) -> Result<Box<dyn SampleSource>, DeviceError> {
    let source = crate::device::RtlSdrSource::open(args.device_index, rate, args.gain)?;
    Ok(Box::new(source))
}

#[cfg(not(feature = "rtlsdr"))]
fn open_rtl(_args: &Cli, _rate: u32) -> Result<Box<dyn SampleSource>, DeviceError> {
    Err(DeviceError::Open(
        "built without the `rtlsdr` feature; use --file or --simulate".to_string(),
    ))
}
