// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

// THIRD PARTY CRATES
use rtlsdr::RTLSDRDevice;
use rustfft::num_complex::Complex32;
use tracing::{debug, info, warn};

// LOCAL CRATE
use crate::device::{iq_from_u8, SampleSource};
use crate::error::DeviceError;

/// Live RTL-SDR dongle. Gain is left to the tuner's automatic mode unless a
/// manual gain (tenths of a dB) is given.
pub struct RtlSdrSource {
    device: Option<RTLSDRDevice>,
    rate: u32,
}

impl RtlSdrSource {
    pub fn open(index: u32, rate: u32, gain_tenth_db: Option<i32>) -> Result<Self, DeviceError> {
        let open_err = |e| DeviceError::Open(format!("{:?}", e));

        let mut device = rtlsdr::open(index as i32).map_err(open_err)?;
        device.set_sample_rate(rate).map_err(open_err)?;
        match gain_tenth_db {
            None => device.set_tuner_gain_mode(false).map_err(open_err)?,
            Some(gain) => {
                device.set_tuner_gain_mode(true).map_err(open_err)?;
                device.set_tuner_gain(gain).map_err(open_err)?;
            }
        }
        device.reset_buffer().map_err(open_err)?;

        info!("RTL-SDR #{} initialized, sample rate {:.2} MHz", index, rate as f64 / 1e6);
        Ok(Self {
            device: Some(device),
            rate,
        })
    }

    fn device(&mut self) -> Result<&mut RTLSDRDevice, DeviceError> {
        self.device.as_mut().ok_or(DeviceError::Closed)
    }
}

impl SampleSource for RtlSdrSource {
    fn sample_rate(&self) -> u32 {
        self.rate
    }

    fn tune(&mut self, center_freq_hz: u32) -> Result<(), DeviceError> {
        self.device()?
            .set_center_freq(center_freq_hz)
            .map_err(|e| DeviceError::Tune {
                freq_hz: center_freq_hz,
                reason: format!("{:?}", e),
            })?;
        debug!("Tuned to {} Hz", center_freq_hz);
        Ok(())
    }

    fn read_samples(&mut self, count: usize) -> Result<Vec<Complex32>, DeviceError> {
        let bytes = self
            .device()?
            .read_sync(count * 2)
            .map_err(|e| DeviceError::Read(format!("{:?}", e)))?;
        if bytes.len() < count * 2 {
            return Err(DeviceError::ShortRead {
                requested: count,
                received: bytes.len() / 2,
            });
        }
        Ok(iq_from_u8(&bytes))
    }

    fn close(&mut self) {
        if let Some(mut device) = self.device.take() {
            if let Err(e) = device.close() {
                warn!("Failed to close RTL-SDR cleanly: {:?}", e);
            }
        }
    }
}

impl Drop for RtlSdrSource {
    fn drop(&mut self) {
        self.close();
    }
}
