// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

/// Averaged power spectrum around the tuned center frequency.
///
/// Both vectors have the FFT length. Offsets start at `-rate/2` and increase by
/// `rate/N` per bin.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectrumSample {
    pub freq_offsets_hz: Vec<f64>,
    pub power_db: Vec<f64>,
}

impl SpectrumSample {
    pub fn len(&self) -> usize {
        self.power_db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.power_db.is_empty()
    }

    /// Power of every bin whose offset lies within `+/-half_width_hz` (inclusive).
    pub fn within(&self, half_width_hz: f64) -> impl Iterator<Item = f64> + '_ {
        self.freq_offsets_hz
            .iter()
            .zip(&self.power_db)
            .filter(move |(offset, _)| offset.abs() <= half_width_hz)
            .map(|(_, power)| *power)
    }

    /// Offset and power of the strongest bin.
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.freq_offsets_hz
            .iter()
            .zip(&self.power_db)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(f, p)| (*f, *p))
    }
}
