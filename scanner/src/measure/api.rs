// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

// THIRD PARTY CRATES
use tracing::debug;

// VENDOR CRATES
use shared::{ChannelDefinition, ChannelId, ChannelMeasurement};

// LOCAL CRATE
use crate::catalog::Catalog;
use crate::device::SampleSource;
use crate::error::{ConfigError, MeasureError};
use crate::measure::{mean, percentile};
use crate::spectrum::{estimate_power_spectrum, SpectrumContext, SpectrumSample};

/// Check that `channel_id` exists and offers `bandwidth_mhz`.
pub fn validate_request(
    catalog: &Catalog,
    channel_id: ChannelId,
    bandwidth_mhz: f64,
) -> Result<&ChannelDefinition, ConfigError> {
    let def = catalog
        .get(channel_id)
        .ok_or(ConfigError::UnknownChannel(channel_id))?;
    if !def.supports(bandwidth_mhz) {
        return Err(ConfigError::BandwidthUnavailable {
            channel: channel_id,
            bandwidth_mhz,
            available: def.bandwidths_mhz().to_vec(),
        });
    }
    Ok(def)
}

/// Tune to a channel, estimate its spectrum and reduce the in-band bins to a
/// noise floor and an average power.
///
/// The request is validated against the catalog before the receiver is touched.
pub fn measure_channel<S: SampleSource + ?Sized>(
    source: &mut S,
    catalog: &Catalog,
    channel_id: ChannelId,
    bandwidth_mhz: f64,
    ctx: &SpectrumContext,
) -> Result<ChannelMeasurement, MeasureError> {
    let def = validate_request(catalog, channel_id, bandwidth_mhz)?;

    let freq_hz = def
        .tuning_freq_hz()
        .ok_or(ConfigError::FrequencyOutOfRange {
            channel: channel_id,
            freq_mhz: def.center_freq_mhz,
        })?;
    source.tune(freq_hz)?;
    debug!("Channel {}: tuned to {} Hz", channel_id, freq_hz);

    let spectrum = estimate_power_spectrum(source, ctx)?;
    let (noise_floor_db, avg_power_db) =
        summarize_window(&spectrum, bandwidth_mhz, ctx.params.noise_percentile).ok_or(
            MeasureError::EmptyWindow {
                channel: channel_id,
                half_bandwidth_hz: half_bandwidth_hz(bandwidth_mhz),
            },
        )?;

    Ok(ChannelMeasurement {
        channel_id,
        center_freq_mhz: def.center_freq_mhz,
        bandwidth_mhz,
        noise_floor_db,
        avg_power_db,
    })
}

/// Noise floor (the given percentile) and mean power of the bins inside the
/// channel bandwidth. `None` when no bin falls inside.
pub fn summarize_window(
    spectrum: &SpectrumSample,
    bandwidth_mhz: f64,
    noise_percentile: f64,
) -> Option<(f64, f64)> {
    let in_band: Vec<f64> = spectrum.within(half_bandwidth_hz(bandwidth_mhz)).collect();
    Some((percentile(&in_band, noise_percentile)?, mean(&in_band)?))
}

fn half_bandwidth_hz(bandwidth_mhz: f64) -> f64 {
    bandwidth_mhz * 1e6 / 2.0
}
