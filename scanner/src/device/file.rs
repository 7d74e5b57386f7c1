// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

// STD LIB
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

// THIRD PARTY CRATES
use rustfft::num_complex::Complex32;
use tracing::{debug, info};

// LOCAL CRATE
use crate::device::{iq_from_u8, SampleSource};
use crate::error::DeviceError;

/// Playback of a raw interleaved u8 IQ capture (as written by `rtl_sdr`).
///
/// Tuning only records the requested frequency; the same recording is replayed for
/// every channel, wrapping around at the end of the file.
pub struct RawFileSource {
    reader: Option<BufReader<File>>,
    rate: u32,
    center_freq_hz: Option<u32>,
}

impl RawFileSource {
    pub fn open(path: &Path, rate: u32) -> Result<Self, DeviceError> {
        let file = File::open(path)
            .map_err(|e| DeviceError::Open(format!("{}: {}", path.display(), e)))?;
        info!("Playing back IQ capture {}", path.display());
        Ok(Self {
            reader: Some(BufReader::new(file)),
            rate,
            center_freq_hz: None,
        })
    }

    pub fn center_freq_hz(&self) -> Option<u32> {
        self.center_freq_hz
    }
}

impl SampleSource for RawFileSource {
    fn sample_rate(&self) -> u32 {
        self.rate
    }

    fn tune(&mut self, center_freq_hz: u32) -> Result<(), DeviceError> {
        if self.reader.is_none() {
            return Err(DeviceError::Closed);
        }
        self.center_freq_hz = Some(center_freq_hz);
        Ok(())
    }

    fn read_samples(&mut self, count: usize) -> Result<Vec<Complex32>, DeviceError> {
        let reader = self.reader.as_mut().ok_or(DeviceError::Closed)?;
        let read_err = |e: std::io::Error| DeviceError::Read(e.to_string());

        let mut bytes = vec![0u8; count * 2];
        let mut filled = 0;
        let mut rewound = false;
        while filled < bytes.len() {
            let n = reader.read(&mut bytes[filled..]).map_err(read_err)?;
            if n == 0 {
                // Two EOFs in a row means there is nothing to replay.
                if rewound {
                    return Err(DeviceError::ShortRead {
                        requested: count,
                        received: filled / 2,
                    });
                }
                debug!("End of capture, rewinding");
                reader.seek(SeekFrom::Start(0)).map_err(read_err)?;
                rewound = true;
                continue;
            }
            rewound = false;
            filled += n;
        }

        Ok(iq_from_u8(&bytes))
    }

    fn close(&mut self) {
        self.reader = None;
    }
}
