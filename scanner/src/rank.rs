// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

use shared::{ChannelMeasurement, RankedResult};

/// Order measurements from the quietest noise floor to the loudest.
///
/// The sort is stable, so channels with equal floors keep their scan order.
pub fn rank_measurements(mut measurements: Vec<ChannelMeasurement>) -> RankedResult {
    measurements.sort_by(|a, b| a.noise_floor_db.total_cmp(&b.noise_floor_db));
    RankedResult::from_ranked(measurements)
}
