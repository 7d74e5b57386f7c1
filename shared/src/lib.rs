// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

use std::fmt;
use std::ops::Deref;

/// Bandwidths (MHz) an 802.11ah channel can be operated at, in scan order.
pub const SUPPORTED_BANDWIDTHS_MHZ: [f64; 4] = [1.0, 2.0, 4.0, 8.0];

pub type ChannelId = u32;

pub fn is_supported_bandwidth(bandwidth_mhz: f64) -> bool {
    SUPPORTED_BANDWIDTHS_MHZ.contains(&bandwidth_mhz)
}

/// MHz to whole Hz as a receiver takes them. `None` when the value is not finite,
/// negative, or does not fit in a `u32`.
pub fn mhz_to_hz(mhz: f64) -> Option<u32> {
    let hz = (mhz * 1e6).round();
    if hz.is_finite() && (0.0..=u32::MAX as f64).contains(&hz) {
        Some(hz as u32)
    } else {
        None
    }
}

/// A channel as listed in the regional channel table.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelDefinition {
    pub id: ChannelId,
    pub center_freq_mhz: f64,
    bandwidths_mhz: Vec<f64>,
}

impl ChannelDefinition {
    /// Bandwidths are sorted ascending and deduplicated.
    pub fn new(id: ChannelId, center_freq_mhz: f64, mut bandwidths_mhz: Vec<f64>) -> Self {
        bandwidths_mhz.sort_by(f64::total_cmp);
        bandwidths_mhz.dedup();
        Self {
            id,
            center_freq_mhz,
            bandwidths_mhz,
        }
    }

    pub fn center_freq_hz(&self) -> f64 {
        self.center_freq_mhz * 1e6
    }

    /// Center frequency the receiver is tuned to, if it is representable.
    pub fn tuning_freq_hz(&self) -> Option<u32> {
        mhz_to_hz(self.center_freq_mhz)
    }

    pub fn bandwidths_mhz(&self) -> &[f64] {
        &self.bandwidths_mhz
    }

    pub fn supports(&self, bandwidth_mhz: f64) -> bool {
        self.bandwidths_mhz.contains(&bandwidth_mhz)
    }
}

/// Noise statistics for one channel measured at one bandwidth.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelMeasurement {
    pub channel_id: ChannelId,
    pub center_freq_mhz: f64,
    pub bandwidth_mhz: f64,
    pub noise_floor_db: f64,
    pub avg_power_db: f64,
}

/// Measurements ordered by noise floor, cleanest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RankedResult(Vec<ChannelMeasurement>);

impl RankedResult {
    /// Wraps measurements that are already in ranked order.
    pub fn from_ranked(measurements: Vec<ChannelMeasurement>) -> Self {
        Self(measurements)
    }

    /// `None` when nothing was measured; no channel is claimed cleanest then.
    pub fn cleanest(&self) -> Option<&ChannelMeasurement> {
        self.0.first()
    }

    /// (rank, measurement) pairs with ranks starting at 1.
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &ChannelMeasurement)> {
        self.0.iter().enumerate().map(|(idx, m)| (idx + 1, m))
    }

    pub fn into_inner(self) -> Vec<ChannelMeasurement> {
        self.0
    }
}

impl Deref for RankedResult {
    type Target = [ChannelMeasurement];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for ChannelMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "channel {} @ {} MHz (BW {} MHz): noise {:.2} dB, avg {:.2} dB",
            self.channel_id,
            self.center_freq_mhz,
            self.bandwidth_mhz,
            self.noise_floor_db,
            self.avg_power_db
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bandwidths_are_sorted_and_unique() {
        let def = ChannelDefinition::new(7, 903.0, vec![4.0, 1.0, 2.0, 1.0]);
        assert_eq!(def.bandwidths_mhz(), &[1.0, 2.0, 4.0]);
        assert!(def.supports(2.0));
        assert!(!def.supports(8.0));
        assert_eq!(def.center_freq_hz(), 903_000_000.0);
    }

    #[test]
    fn empty_result_has_no_cleanest_channel() {
        let ranked = RankedResult::default();
        assert!(ranked.cleanest().is_none());
        assert!(ranked.is_empty());
    }

    #[test]
    fn ranks_start_at_one() {
        let m = ChannelMeasurement {
            channel_id: 1,
            center_freq_mhz: 902.5,
            bandwidth_mhz: 1.0,
            noise_floor_db: -80.0,
            avg_power_db: -75.0,
        };
        let ranked = RankedResult::from_ranked(vec![m.clone()]);
        let first = ranked.ranked().next();
        assert_eq!(first, Some((1, &m)));
        assert_eq!(ranked.cleanest(), Some(&m));
    }

    #[test]
    fn tuning_frequency_must_fit_the_receiver() {
        assert_eq!(mhz_to_hz(902.5), Some(902_500_000));
        assert_eq!(mhz_to_hz(4294.967295), Some(u32::MAX));
        assert_eq!(mhz_to_hz(5000.0), None);
        assert_eq!(mhz_to_hz(-1.0), None);
        assert_eq!(mhz_to_hz(f64::NAN), None);
        assert_eq!(ChannelDefinition::new(1, 5000.0, vec![1.0]).tuning_freq_hz(), None);
    }

    #[test]
    fn supported_bandwidths() {
        assert!(is_supported_bandwidth(8.0));
        assert!(!is_supported_bandwidth(3.0));
    }
}
