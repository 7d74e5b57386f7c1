// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

use rustfft::num_complex::Complex32;

use crate::error::DeviceError;

/// A single receiver that can be tuned and read from, one frequency at a time.
pub trait SampleSource {
    /// Fixed sample rate of the receiver in Hz.
    fn sample_rate(&self) -> u32;

    /// Retune the receiver. Calling it again with the same frequency is allowed.
    fn tune(&mut self, center_freq_hz: u32) -> Result<(), DeviceError>;

    /// Blocking read of exactly `count` baseband samples.
    fn read_samples(&mut self, count: usize) -> Result<Vec<Complex32>, DeviceError>;

    /// Release the receiver. Safe to call more than once.
    fn close(&mut self);
}

impl<T: SampleSource + ?Sized> SampleSource for Box<T> {
    fn sample_rate(&self) -> u32 {
        (**self).sample_rate()
    }

    fn tune(&mut self, center_freq_hz: u32) -> Result<(), DeviceError> {
        (**self).tune(center_freq_hz)
    }

    fn read_samples(&mut self, count: usize) -> Result<Vec<Complex32>, DeviceError> {
        (**self).read_samples(count)
    }

    fn close(&mut self) {
        (**self).close()
    }
}
