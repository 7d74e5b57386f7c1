// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

// STD LIB
use std::thread;

// THIRD PARTY CRATES
use tracing::{debug, info, warn};

// VENDOR CRATES
use shared::SUPPORTED_BANDWIDTHS_MHZ;

// LOCAL CRATE
use crate::catalog::Catalog;
use crate::device::SampleSource;
use crate::measure::measure_channel;
use crate::rank::rank_measurements;
use crate::scan::{ChannelFailure, Interrupt, ScanContext, ScanReport};

/// Measure every catalog channel offering `bandwidth_mhz`, in ascending channel
/// order, and rank the ones that succeeded.
///
/// A failing channel is logged and recorded, then the scan moves on. The
/// interrupt is checked before each channel; the source is left open for the
/// caller to close.
pub fn scan_bandwidth<S: SampleSource + ?Sized>(
    source: &mut S,
    catalog: &Catalog,
    bandwidth_mhz: f64,
    ctx: &ScanContext,
    interrupt: &Interrupt,
) -> ScanReport {
    let total = catalog.channels_with_bandwidth(bandwidth_mhz).count();
    info!(
        "Scanning {} channels at {} MHz bandwidth in region {}",
        total,
        bandwidth_mhz,
        catalog.region()
    );

    let mut measurements = Vec::with_capacity(total);
    let mut failures = Vec::new();
    let mut interrupted = false;

    for (idx, def) in catalog.channels_with_bandwidth(bandwidth_mhz).enumerate() {
        if interrupt.is_triggered() {
            warn!(
                "Scan interrupted after {} of {} channels at {} MHz",
                idx, total, bandwidth_mhz
            );
            interrupted = true;
            break;
        }

        if ctx.verbose {
            info!(
                "[{}/{}] Measuring channel {} at {} MHz",
                idx + 1,
                total,
                def.id,
                def.center_freq_mhz
            );
        }

        match measure_channel(source, catalog, def.id, bandwidth_mhz, &ctx.spectrum) {
            Ok(measurement) => {
                if ctx.verbose {
                    info!(
                        "  Noise floor: {:.2} dB, average power: {:.2} dB",
                        measurement.noise_floor_db, measurement.avg_power_db
                    );
                }
                measurements.push(measurement);
            }
            Err(e) => {
                warn!("Skipping channel {} ({} error): {}", def.id, e.kind(), e);
                failures.push(ChannelFailure {
                    channel_id: def.id,
                    error: e,
                });
            }
        }
    }

    debug!(
        "{} MHz pass: {} measured, {} skipped",
        bandwidth_mhz,
        measurements.len(),
        failures.len()
    );

    ScanReport {
        bandwidth_mhz,
        ranked: rank_measurements(measurements),
        failures,
        interrupted,
    }
}

/// Run a pass for 1, 2, 4 and 8 MHz in that order, pausing between passes.
///
/// Bandwidths no channel offers are skipped. An interrupted pass is the last one.
pub fn scan_all_bandwidths<S: SampleSource + ?Sized>(
    source: &mut S,
    catalog: &Catalog,
    ctx: &ScanContext,
    interrupt: &Interrupt,
) -> Vec<ScanReport> {
    let mut reports = Vec::with_capacity(SUPPORTED_BANDWIDTHS_MHZ.len());

    for bandwidth_mhz in SUPPORTED_BANDWIDTHS_MHZ {
        if interrupt.is_triggered() {
            break;
        }
        if catalog.channels_with_bandwidth(bandwidth_mhz).next().is_none() {
            info!(
                "No {} MHz channels in region {}, skipping",
                bandwidth_mhz,
                catalog.region()
            );
            continue;
        }
        if !reports.is_empty() && !ctx.bandwidth_pause.is_zero() {
            thread::sleep(ctx.bandwidth_pause);
        }

        let report = scan_bandwidth(source, catalog, bandwidth_mhz, ctx, interrupt);
        let stop = report.interrupted;
        reports.push(report);
        if stop {
            break;
        }
    }

    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::time::{Duration, Instant};

    use rustfft::num_complex::Complex32;
    use shared::ChannelDefinition;

    use crate::device::SyntheticSource;
    use crate::error::DeviceError;
    use crate::spectrum::{SpectrumContext, SpectrumParams};

    fn catalog() -> Catalog {
        let mut channels = BTreeMap::new();
        for (id, freq, bws) in [
            (5u32, 904.0, vec![1.0, 2.0]),
            (1, 902.0, vec![1.0]),
            (3, 903.0, vec![1.0]),
        ] {
            channels.insert(id, ChannelDefinition::new(id, freq, bws));
        }
        Catalog::new("US", channels)
    }

    fn context() -> ScanContext {
        let spectrum = SpectrumContext::new(SpectrumParams {
            num_samples: 512,
            iterations: 1,
            settle: Duration::ZERO,
            ..Default::default()
        });
        let mut ctx = ScanContext::new(spectrum, true);
        ctx.bandwidth_pause = Duration::ZERO;
        ctx
    }

    /// Triggers the interrupt on the n-th tune, after letting it through.
    struct InterruptingSource {
        inner: SyntheticSource,
        interrupt: Interrupt,
        on_tune: usize,
    }

    impl SampleSource for InterruptingSource {
        fn sample_rate(&self) -> u32 {
            self.inner.sample_rate()
        }
        fn tune(&mut self, center_freq_hz: u32) -> Result<(), DeviceError> {
            self.inner.tune(center_freq_hz)?;
            if self.inner.tune_calls() == self.on_tune {
                self.interrupt.trigger();
            }
            Ok(())
        }
        fn read_samples(&mut self, count: usize) -> Result<Vec<Complex32>, DeviceError> {
            self.inner.read_samples(count)
        }
        fn close(&mut self) {
            self.inner.close()
        }
    }

    #[test]
    fn failing_channel_is_skipped_and_recorded() {
        let mut source = SyntheticSource::new(2_400_000, 4)
            .with_noise_db(902_000_000, -45.0)
            .with_noise_db(904_000_000, -65.0)
            .failing_at(903_000_000);

        let report = scan_bandwidth(&mut source, &catalog(), 1.0, &context(), &Interrupt::new());

        let ranked: Vec<u32> = report.ranked.iter().map(|m| m.channel_id).collect();
        assert_eq!(ranked, vec![5, 1]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].channel_id, 3);
        assert_eq!(report.failures[0].kind(), "acquisition");
        assert_eq!(report.attempted(), 3);
        assert!(!report.interrupted);
        assert!(!source.is_closed());
    }

    #[test]
    fn channels_visited_in_ascending_order() {
        let mut source = SyntheticSource::new(2_400_000, 0)
            .failing_at(902_000_000)
            .failing_at(903_000_000)
            .failing_at(904_000_000);
        let report = scan_bandwidth(&mut source, &catalog(), 1.0, &context(), &Interrupt::new());
        let order: Vec<u32> = report.failures.iter().map(|f| f.channel_id).collect();
        assert_eq!(order, vec![1, 3, 5]);
        assert!(report.ranked.cleanest().is_none());
    }

    #[test]
    fn only_channels_with_the_bandwidth_are_measured() {
        let mut source = SyntheticSource::new(2_400_000, 0);
        let report = scan_bandwidth(&mut source, &catalog(), 2.0, &context(), &Interrupt::new());
        assert_eq!(report.ranked.len(), 1);
        assert_eq!(report.ranked[0].channel_id, 5);
        assert_eq!(source.tune_calls(), 1);
    }

    #[test]
    fn interrupt_before_scan_touches_nothing() {
        let interrupt = Interrupt::new();
        interrupt.trigger();
        let mut source = SyntheticSource::new(2_400_000, 0);

        let report = scan_bandwidth(&mut source, &catalog(), 1.0, &context(), &interrupt);
        assert!(report.interrupted);
        assert!(report.ranked.is_empty());
        assert_eq!(source.tune_calls(), 0);
    }

    #[test]
    fn interrupt_keeps_partial_results() {
        let interrupt = Interrupt::new();
        let mut source = InterruptingSource {
            inner: SyntheticSource::new(2_400_000, 2),
            interrupt: interrupt.clone(),
            on_tune: 2,
        };

        let report = scan_bandwidth(&mut source, &catalog(), 1.0, &context(), &interrupt);
        let ranked: Vec<u32> = report.ranked.iter().map(|m| m.channel_id).collect();
        assert!(report.interrupted);
        assert_eq!(ranked.len(), 2);
        assert!(ranked.contains(&1) && ranked.contains(&3));
    }

    #[test]
    fn pauses_between_bandwidth_passes() {
        let mut ctx = context();
        ctx.bandwidth_pause = Duration::from_millis(40);
        let mut source = SyntheticSource::new(2_400_000, 0);

        let start = Instant::now();
        let reports = scan_all_bandwidths(&mut source, &catalog(), &ctx, &Interrupt::new());
        assert_eq!(reports.len(), 2);
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn single_pass_does_not_pause() {
        let mut channels = BTreeMap::new();
        channels.insert(1, ChannelDefinition::new(1, 902.5, vec![1.0]));
        let catalog = Catalog::new("US", channels);
        let mut ctx = context();
        ctx.bandwidth_pause = Duration::from_secs(5);
        let mut source = SyntheticSource::new(2_400_000, 0);

        let start = Instant::now();
        let reports = scan_all_bandwidths(&mut source, &catalog, &ctx, &Interrupt::new());
        assert_eq!(reports.len(), 1);
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn all_bandwidths_skips_unoffered() {
        let mut source = SyntheticSource::new(2_400_000, 0);
        let reports = scan_all_bandwidths(&mut source, &catalog(), &context(), &Interrupt::new());
        let bandwidths: Vec<f64> = reports.iter().map(|r| r.bandwidth_mhz).collect();
        assert_eq!(bandwidths, vec![1.0, 2.0]);
        assert_eq!(reports[0].ranked.len(), 3);
        assert_eq!(reports[1].ranked.len(), 1);
    }

    #[test]
    fn all_bandwidths_stops_after_interrupt() {
        let interrupt = Interrupt::new();
        let mut source = InterruptingSource {
            inner: SyntheticSource::new(2_400_000, 0),
            interrupt: interrupt.clone(),
            on_tune: 1,
        };
        let reports = scan_all_bandwidths(&mut source, &catalog(), &context(), &interrupt);
        assert_eq!(reports.len(), 1);
        assert!(reports[0].interrupted);
        assert_eq!(reports[0].ranked.len(), 1);
    }
}
