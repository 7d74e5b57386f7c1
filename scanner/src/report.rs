// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

// STD LIB
use std::io::{self, Write};

// VENDOR CRATES
use shared::ChannelMeasurement;

// LOCAL CRATE
use crate::catalog::Catalog;
use crate::scan::ScanReport;

const RULE_WIDTH: usize = 60;

fn heavy_rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn light_rule() -> String {
    "-".repeat(RULE_WIDTH)
}

/// Ranked table for one bandwidth pass, cleanest channel starred.
pub fn write_results<W: Write>(out: &mut W, report: &ScanReport, region: &str) -> io::Result<()> {
    writeln!(out, "\n{}", heavy_rule())?;
    writeln!(
        out,
        "SCAN RESULTS - {} MHz, region {} (sorted by cleanest channel)",
        report.bandwidth_mhz, region
    )?;
    writeln!(out, "{}", heavy_rule())?;
    writeln!(
        out,
        "{:<6} {:<4} {:<12} {:<9} {:<11} {:<11}",
        "Rank", "Ch", "Freq(MHz)", "BW(MHz)", "Noise(dB)", "AvgPwr(dB)"
    )?;
    writeln!(out, "{}", light_rule())?;

    for (rank, m) in report.ranked.ranked() {
        let marker = if rank == 1 { '*' } else { ' ' };
        writeln!(
            out,
            "{}{:<5} {:<4} {:<12.1} {:<9.1} {:<11.2} {:<11.2}",
            marker,
            rank,
            m.channel_id,
            m.center_freq_mhz,
            m.bandwidth_mhz,
            m.noise_floor_db,
            m.avg_power_db
        )?;
    }

    match report.ranked.cleanest() {
        Some(best) => {
            writeln!(out, "\n{}", heavy_rule())?;
            writeln!(
                out,
                "* CLEANEST CHANNEL: Channel {} @ {} MHz (Noise: {:.2} dB)",
                best.channel_id, best.center_freq_mhz, best.noise_floor_db
            )?;
            writeln!(out, "{}", heavy_rule())?;
        }
        None => writeln!(out, "No channels were measured successfully.")?,
    }

    if !report.failures.is_empty() {
        writeln!(out, "\nSkipped channels:")?;
        for failure in &report.failures {
            writeln!(
                out,
                "  Channel {:<4} {} error: {}",
                failure.channel_id,
                failure.kind(),
                failure.error
            )?;
        }
    }

    if report.interrupted {
        writeln!(
            out,
            "\nScan interrupted by user: partial results ({} of the channels were attempted).",
            report.attempted()
        )?;
    }
    writeln!(out)
}

pub fn write_measurement<W: Write>(out: &mut W, m: &ChannelMeasurement) -> io::Result<()> {
    writeln!(out, "\n{}", heavy_rule())?;
    writeln!(
        out,
        "Channel {} @ {} MHz, {} MHz bandwidth",
        m.channel_id, m.center_freq_mhz, m.bandwidth_mhz
    )?;
    writeln!(out, "  Noise floor: {:.2} dB", m.noise_floor_db)?;
    writeln!(out, "  Avg power:   {:.2} dB", m.avg_power_db)?;
    writeln!(out, "{}", heavy_rule())
}

/// Channel table for the region followed by per-bandwidth channel counts.
pub fn write_catalog<W: Write>(out: &mut W, catalog: &Catalog) -> io::Result<()> {
    writeln!(out, "\n{}", heavy_rule())?;
    writeln!(out, "{} channels for region {}", catalog.len(), catalog.region())?;
    writeln!(out, "{}", heavy_rule())?;
    writeln!(out, "{:<10} {:<15} Bandwidths (MHz)", "Channel", "Freq (MHz)")?;
    writeln!(out, "{}", "-".repeat(50))?;

    for def in catalog.channels() {
        let bandwidths: Vec<String> = def.bandwidths_mhz().iter().map(|bw| bw.to_string()).collect();
        writeln!(
            out,
            "{:<10} {:<15.1} {}",
            def.id,
            def.center_freq_mhz,
            bandwidths.join(", ")
        )?;
    }

    writeln!(out, "\n{}", heavy_rule())?;
    writeln!(out, "Bandwidth statistics for {}:", catalog.region())?;
    writeln!(out, "{}", heavy_rule())?;
    for (bw, count) in catalog.bandwidth_counts() {
        writeln!(out, "  {} MHz: {} channels", bw, count)?;
    }
    Ok(())
}

pub fn print_results(report: &ScanReport, region: &str) -> io::Result<()> {
    write_results(&mut io::stdout().lock(), report, region)
}

pub fn print_measurement(m: &ChannelMeasurement) -> io::Result<()> {
    write_measurement(&mut io::stdout().lock(), m)
}

pub fn print_catalog(catalog: &Catalog) -> io::Result<()> {
    write_catalog(&mut io::stdout().lock(), catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use shared::ChannelDefinition;

    use crate::error::{DeviceError, MeasureError};
    use crate::rank::rank_measurements;
    use crate::scan::ChannelFailure;

    fn measurement(channel_id: u32, noise_floor_db: f64) -> ChannelMeasurement {
        ChannelMeasurement {
            channel_id,
            center_freq_mhz: 902.0 + channel_id as f64 * 0.5,
            bandwidth_mhz: 2.0,
            noise_floor_db,
            avg_power_db: noise_floor_db + 4.0,
        }
    }

    fn render(report: &ScanReport) -> String {
        let mut buf = Vec::new();
        write_results(&mut buf, report, "US").unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn stars_cleanest_and_lists_failures() {
        let report = ScanReport {
            bandwidth_mhz: 2.0,
            ranked: rank_measurements(vec![measurement(6, -40.0), measurement(2, -72.5)]),
            failures: vec![ChannelFailure {
                channel_id: 4,
                error: MeasureError::Acquisition(DeviceError::Read("usb".into())),
            }],
            interrupted: false,
        };
        let text = render(&report);

        let rows: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with('*') || l.starts_with(' '))
            .collect();
        assert!(rows[0].starts_with("*1     2"), "{}", rows[0]);
        assert!(text.contains("CLEANEST CHANNEL: Channel 2 @ 903 MHz (Noise: -72.50 dB)"));
        assert!(text.contains("Channel 4    acquisition error"));
        assert!(!text.contains("interrupted"));
    }

    #[test]
    fn empty_report_claims_no_cleanest() {
        let report = ScanReport {
            bandwidth_mhz: 8.0,
            ranked: Default::default(),
            failures: Vec::new(),
            interrupted: true,
        };
        let text = render(&report);
        assert!(!text.contains("CLEANEST"));
        assert!(text.contains("No channels were measured"));
        assert!(text.contains("interrupted"));
    }

    #[test]
    fn catalog_listing_counts_bandwidths() {
        let mut channels = BTreeMap::new();
        channels.insert(1, ChannelDefinition::new(1, 902.5, vec![1.0]));
        channels.insert(2, ChannelDefinition::new(2, 903.0, vec![2.0, 1.0]));
        let catalog = Catalog::new("US", channels);

        let mut buf = Vec::new();
        write_catalog(&mut buf, &catalog).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("2          903.0           1, 2"));
        assert!(text.contains("  1 MHz: 2 channels"));
        assert!(text.contains("  8 MHz: 0 channels"));
    }
}
