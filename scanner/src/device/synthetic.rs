// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

// STD LIB
use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

// THIRD PARTY CRATES
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rustfft::num_complex::Complex32;
use tracing::debug;

// LOCAL CRATE
use crate::device::SampleSource;
use crate::error::DeviceError;

/// A continuous tone present when tuned to a given center frequency.
#[derive(Clone, Copy, Debug)]
struct Tone {
    offset_hz: f32,
    amplitude: f32,
}

/// Simulated receiver producing complex Gaussian noise whose power depends on the
/// tuned frequency. Deterministic for a given seed.
pub struct SyntheticSource {
    rate: u32,
    rng: StdRng,
    default_noise_db: f64,
    random_spread_db: Option<f64>,
    noise_db: HashMap<u32, f64>,
    tones: HashMap<u32, Vec<Tone>>,
    failing: HashSet<u32>,
    tuned: Option<u32>,
    closed: bool,
    tune_calls: usize,
    read_calls: usize,
}

impl SyntheticSource {
    pub fn new(rate: u32, seed: u64) -> Self {
        Self {
            rate,
            rng: StdRng::seed_from_u64(seed),
            default_noise_db: -30.0,
            random_spread_db: None,
            noise_db: HashMap::new(),
            tones: HashMap::new(),
            failing: HashSet::new(),
            tuned: None,
            closed: false,
            tune_calls: 0,
            read_calls: 0,
        }
    }

    /// Noise power (dB, relative to full scale) at frequencies without an explicit level.
    pub fn with_default_noise_db(mut self, noise_db: f64) -> Self {
        self.default_noise_db = noise_db;
        self
    }

    /// Draw the level of each newly tuned frequency uniformly within `+/-spread_db`
    /// of the default level.
    pub fn with_random_levels(mut self, spread_db: f64) -> Self {
        self.random_spread_db = Some(spread_db.abs());
        self
    }

    pub fn with_noise_db(mut self, center_freq_hz: u32, noise_db: f64) -> Self {
        self.noise_db.insert(center_freq_hz, noise_db);
        self
    }

    pub fn with_tone(mut self, center_freq_hz: u32, offset_hz: f32, power_db: f64) -> Self {
        let amplitude = 10f64.powf(power_db / 20.0) as f32;
        self.tones
            .entry(center_freq_hz)
            .or_default()
            .push(Tone { offset_hz, amplitude });
        self
    }

    /// Reads fail while tuned to `center_freq_hz`.
    pub fn failing_at(mut self, center_freq_hz: u32) -> Self {
        self.failing.insert(center_freq_hz);
        self
    }

    pub fn tune_calls(&self) -> usize {
        self.tune_calls
    }

    pub fn read_calls(&self) -> usize {
        self.read_calls
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn noise_level_db(&mut self, freq: u32) -> f64 {
        if let Some(level) = self.noise_db.get(&freq) {
            return *level;
        }
        let level = match self.random_spread_db {
            Some(spread) if spread > 0.0 => {
                self.default_noise_db + self.rng.gen_range(-spread..=spread)
            }
            _ => self.default_noise_db,
        };
        self.noise_db.insert(freq, level);
        level
    }
}

impl SampleSource for SyntheticSource {
    fn sample_rate(&self) -> u32 {
        self.rate
    }

    fn tune(&mut self, center_freq_hz: u32) -> Result<(), DeviceError> {
        if self.closed {
            return Err(DeviceError::Closed);
        }
        self.tune_calls += 1;
        self.tuned = Some(center_freq_hz);
        Ok(())
    }

    fn read_samples(&mut self, count: usize) -> Result<Vec<Complex32>, DeviceError> {
        if self.closed {
            return Err(DeviceError::Closed);
        }
        self.read_calls += 1;
        let freq = self
            .tuned
            .ok_or_else(|| DeviceError::Read("receiver was never tuned".to_string()))?;
        if self.failing.contains(&freq) {
            return Err(DeviceError::Read(format!("simulated failure at {} Hz", freq)));
        }

        // Split the noise power evenly between I and Q.
        let noise_db = self.noise_level_db(freq);
        let sigma = (10f64.powf(noise_db / 10.0) / 2.0).sqrt() as f32;
        let normal = Normal::new(0.0f32, sigma).map_err(|e| DeviceError::Read(e.to_string()))?;
        debug!("Synthesizing {} samples at {} Hz ({:.1} dB)", count, freq, noise_db);

        let mut samples: Vec<Complex32> = (0..count)
            .map(|_| Complex32::new(normal.sample(&mut self.rng), normal.sample(&mut self.rng)))
            .collect();

        if let Some(tones) = self.tones.get(&freq) {
            let rate = self.rate as f64;
            for tone in tones {
                let step = 2.0 * PI * tone.offset_hz as f64 / rate;
                for (n, sample) in samples.iter_mut().enumerate() {
                    let phase = (step * n as f64).rem_euclid(2.0 * PI);
                    *sample += Complex32::from_polar(tone.amplitude, phase as f32);
                }
            }
        }

        Ok(samples)
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
