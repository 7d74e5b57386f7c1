// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

use rustfft::num_complex::Complex32;

/// Interleaved unsigned 8-bit I/Q (the RTL-SDR wire format) to complex samples in [-1, 1].
pub fn iq_from_u8(bytes: &[u8]) -> Vec<Complex32> {
    bytes
        .chunks_exact(2)
        .map(|iq| Complex32::new(to_unit(iq[0]), to_unit(iq[1])))
        .collect()
}

fn to_unit(raw: u8) -> f32 {
    (raw as f32 - 127.5) / 127.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_full_scale() {
        let samples = iq_from_u8(&[0, 255, 255, 0]);
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0], Complex32::new(-1.0, 1.0));
        assert_eq!(samples[1], Complex32::new(1.0, -1.0));
    }

    #[test]
    fn ignores_trailing_half_sample() {
        assert_eq!(iq_from_u8(&[128, 128, 7]).len(), 1);
    }
}
