// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

// STD LIB
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

// THIRD PARTY CRATES
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info, warn};

// LOCAL CRATES
use crate::catalog::{Catalog, ChannelRow};
use crate::error::CatalogError;
use shared::{is_supported_bandwidth, mhz_to_hz, ChannelDefinition, ChannelId};

/// Load the channels for `region` from the CSV channel table at `path`.
///
/// When `path` does not exist it is retried relative to the directory holding the
/// executable, so a table shipped next to the binary is found from any working directory.
pub fn load_catalog(path: &Path, region: &str) -> Result<Catalog, CatalogError> {
    let resolved = resolve_table_path(path);
    let file = File::open(&resolved).map_err(|source| CatalogError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    let catalog = parse_catalog(file, &resolved, region)?;
    info!(
        "Loaded {} channels for region {} from {}",
        catalog.len(),
        region,
        resolved.display()
    );
    Ok(catalog)
}

/// Parse a channel table from any reader. `path` only labels errors.
pub fn parse_catalog<R: Read>(reader: R, path: &Path, region: &str) -> Result<Catalog, CatalogError> {
    let parse_err = |source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = reader.headers().map_err(parse_err)?.clone();

    let mut accumulated: BTreeMap<ChannelId, (f64, Vec<f64>)> = BTreeMap::new();
    let mut record = StringRecord::new();
    while reader.read_record(&mut record).map_err(parse_err)? {
        let line = record.position().map_or(0, |pos| pos.line());
        let row: ChannelRow = record.deserialize(Some(&headers)).map_err(parse_err)?;

        match row.country_code.as_deref().map(str::trim) {
            Some(code) if code == region => {}
            _ => continue,
        }

        let invalid = |reason: String| CatalogError::InvalidRow {
            path: path.to_path_buf(),
            line,
            reason,
        };
        let id: ChannelId = parse_field(row.s1g_chan.as_deref(), "s1g_chan").map_err(invalid)?;
        let center_freq_mhz: f64 =
            parse_field(row.centre_freq_mhz.as_deref(), "centre_freq_mhz").map_err(invalid)?;
        let bandwidth_mhz: f64 = parse_field(row.bw.as_deref(), "bw").map_err(invalid)?;

        if id == 0 || !(center_freq_mhz > 0.0) {
            return Err(invalid(format!(
                "channel {} has invalid center frequency {} MHz",
                id, center_freq_mhz
            )));
        }

        if mhz_to_hz(center_freq_mhz).is_none() {
            return Err(invalid(format!(
                "channel {} center frequency {} MHz is outside the tunable range",
                id, center_freq_mhz
            )));
        }

        if !is_supported_bandwidth(bandwidth_mhz) {
            warn!(
                "Skipping line {}: unsupported bandwidth {} MHz for channel {}",
                line, bandwidth_mhz, id
            );
            continue;
        }

        let (known_freq, bandwidths) = accumulated
            .entry(id)
            .or_insert_with(|| (center_freq_mhz, Vec::new()));
        if *known_freq != center_freq_mhz {
            warn!(
                "Line {}: channel {} listed at {} MHz, keeping {} MHz",
                line, id, center_freq_mhz, known_freq
            );
        }
        if !bandwidths.contains(&bandwidth_mhz) {
            bandwidths.push(bandwidth_mhz);
        }
    }

    if accumulated.is_empty() {
        return Err(CatalogError::RegionNotFound {
            region: region.to_string(),
            path: path.to_path_buf(),
        });
    }

    let channels = accumulated
        .into_iter()
        .map(|(id, (freq, bandwidths))| (id, ChannelDefinition::new(id, freq, bandwidths)))
        .collect();
    Ok(Catalog::new(region, channels))
}

fn resolve_table_path(path: &Path) -> PathBuf {
    if path.exists() {
        return path.to_path_buf();
    }

    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(path)));
    match beside_exe {
        Some(candidate) if candidate.exists() => {
            debug!("Using channel table at {}", candidate.display());
            candidate
        }
        _ => path.to_path_buf(),
    }
}

fn parse_field<T: std::str::FromStr>(value: Option<&str>, name: &str) -> Result<T, String> {
    let value = value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| format!("missing {}", name))?;
    value
        .parse()
        .map_err(|_| format!("invalid {} value {:?}", name, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TABLE: &str = "\
country_code,s1g_chan,centre_freq_mhz,bw,notes
US,1,902.5,1,
US,3,903.5,1,
US,2,903.0,2,
US,3,903.5,2,
US,3,903.5,2,duplicate
,9,999.0,1,
EU,1,863.5,1,
US,6,905.0,4,
";

    fn parse(table: &str, region: &str) -> Result<Catalog, CatalogError> {
        parse_catalog(table.as_bytes(), Path::new("halow_channels.csv"), region)
    }

    #[test]
    fn accumulates_bandwidths_per_channel() {
        let catalog = parse(TABLE, "US").unwrap();

        assert_eq!(catalog.len(), 4);
        let ch3 = catalog.get(3).unwrap();
        assert_eq!(ch3.center_freq_mhz, 903.5);
        assert_eq!(ch3.bandwidths_mhz(), &[1.0, 2.0]);

        let ids: Vec<ChannelId> = catalog.channels().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 6]);
    }

    #[test]
    fn filters_by_region() {
        let catalog = parse(TABLE, "EU").unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(1).unwrap().center_freq_mhz, 863.5);
    }

    #[test]
    fn channels_with_bandwidth_are_ascending() {
        let catalog = parse(TABLE, "US").unwrap();
        let ids: Vec<ChannelId> = catalog.channels_with_bandwidth(1.0).map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(
            catalog.bandwidth_counts(),
            [(1.0, 2), (2.0, 2), (4.0, 1), (8.0, 0)]
        );
    }

    #[test]
    fn empty_region_is_not_found() {
        let err = parse(TABLE, "JP").unwrap_err();
        assert!(matches!(err, CatalogError::RegionNotFound { ref region, .. } if region == "JP"));
    }

    #[test]
    fn missing_table_is_unavailable() {
        let err = load_catalog(Path::new("/nonexistent/halow_channels.csv"), "US").unwrap_err();
        assert!(matches!(err, CatalogError::SourceUnavailable { .. }));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TABLE.as_bytes()).unwrap();

        let catalog = load_catalog(file.path(), "US").unwrap();
        assert_eq!(catalog.region(), "US");
        assert_eq!(catalog.get(6).unwrap().bandwidths_mhz(), &[4.0]);
    }

    #[test]
    fn unsupported_bandwidth_rows_are_skipped() {
        let table = "country_code,s1g_chan,centre_freq_mhz,bw\nUS,1,902.5,16\nUS,1,902.5,1\n";
        let catalog = parse(table, "US").unwrap();
        assert_eq!(catalog.get(1).unwrap().bandwidths_mhz(), &[1.0]);
    }

    #[test]
    fn malformed_region_row_is_rejected() {
        let table = "country_code,s1g_chan,centre_freq_mhz,bw\nUS,abc,902.5,1\n";
        let err = parse(table, "US").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRow { line: 2, .. }));
    }

    #[test]
    fn untunable_center_frequency_is_rejected() {
        let table = "country_code,s1g_chan,centre_freq_mhz,bw\nUS,1,902.5,1\nUS,2,5000.0,1\n";
        let err = parse(table, "US").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRow { line: 3, .. }), "{err}");
    }
}
