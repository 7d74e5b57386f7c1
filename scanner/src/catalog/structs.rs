// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

use std::collections::BTreeMap;

use serde::Deserialize;
use shared::{ChannelDefinition, ChannelId, SUPPORTED_BANDWIDTHS_MHZ};

/// One row of the channel table. Only rows for the selected region are parsed further.
#[derive(Debug, Deserialize)]
pub(crate) struct ChannelRow {
    #[serde(default)]
    pub(crate) country_code: Option<String>,
    #[serde(default)]
    pub(crate) s1g_chan: Option<String>,
    #[serde(default)]
    pub(crate) centre_freq_mhz: Option<String>,
    #[serde(default)]
    pub(crate) bw: Option<String>,
}

/// Channels legally available in one region, keyed by channel number.
#[derive(Clone, Debug)]
pub struct Catalog {
    region: String,
    channels: BTreeMap<ChannelId, ChannelDefinition>,
}

impl Catalog {
    pub fn new(region: impl Into<String>, channels: BTreeMap<ChannelId, ChannelDefinition>) -> Self {
        Self {
            region: region.into(),
            channels,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn get(&self, id: ChannelId) -> Option<&ChannelDefinition> {
        self.channels.get(&id)
    }

    /// Channels in ascending id order.
    pub fn channels(&self) -> impl Iterator<Item = &ChannelDefinition> {
        self.channels.values()
    }

    /// Channels offering `bandwidth_mhz`, in ascending id order.
    pub fn channels_with_bandwidth(
        &self,
        bandwidth_mhz: f64,
    ) -> impl Iterator<Item = &ChannelDefinition> {
        self.channels
            .values()
            .filter(move |def| def.supports(bandwidth_mhz))
    }

    /// Number of channels offering each supported bandwidth.
    pub fn bandwidth_counts(&self) -> [(f64, usize); 4] {
        SUPPORTED_BANDWIDTHS_MHZ.map(|bw| (bw, self.channels_with_bandwidth(bw).count()))
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
