// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

use shared::{ChannelId, RankedResult};

use crate::error::MeasureError;

/// A channel that was skipped, and why.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelFailure {
    pub channel_id: ChannelId,
    pub error: MeasureError,
}

impl ChannelFailure {
    pub fn kind(&self) -> &'static str {
        self.error.kind()
    }
}

/// Outcome of one bandwidth pass.
#[derive(Clone, Debug, PartialEq)]
pub struct ScanReport {
    pub bandwidth_mhz: f64,
    pub ranked: RankedResult,
    pub failures: Vec<ChannelFailure>,
    /// The pass stopped early on user request; `ranked` holds what was measured.
    pub interrupted: bool,
}

impl ScanReport {
    pub fn attempted(&self) -> usize {
        self.ranked.len() + self.failures.len()
    }
}
