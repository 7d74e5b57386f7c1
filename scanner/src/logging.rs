// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

// STD LIB
use std::path::Path;

// THIRD PARTY CRATES
use tracing_appender::rolling::daily;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

// LOCAL CRATE
use crate::cli::Cli;
use crate::error::ScanError;

/// Crate targets the `--log-level` applies to when `RUST_LOG` is not set.
fn default_directives(level: &str) -> String {
    format!("halow_scanner={level},halowscan={level}")
}

/// Initialize the tracing subscriber with multiple output layers
pub fn init_logging(args: &Cli) -> Result<(), ScanError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(&args.log_level)))
        .map_err(|e| ScanError::Logging(e.to_string()))?;

    // Console layer - human-readable output to stderr
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(env_filter.clone());

    let registry = tracing_subscriber::registry();

    let result = if args.log_to_file {
        let log_dir = Path::new(&args.log_dir);
        std::fs::create_dir_all(log_dir).map_err(|e| ScanError::Logging(e.to_string()))?;

        // File layer - human-readable output to rolling files
        let file_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(daily(log_dir, "halowscan.log"))
            .with_filter(env_filter.clone());

        // JSON layer - structured JSON output to rolling files
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(daily(log_dir, "halowscan.json"))
            .with_filter(env_filter);

        registry
            .with(console_layer)
            .with(file_layer)
            .with(json_layer)
            .try_init()
    } else {
        registry.with(console_layer).try_init()
    };
    result.map_err(|e| ScanError::Logging(e.to_string()))?;

    tracing::debug!("Logging initialized with level: {}", args.log_level);
    if args.log_to_file {
        tracing::info!("Log files will be written to: {}", args.log_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_cover_library_and_binary() {
        let filter = EnvFilter::try_new(default_directives("debug"));
        assert!(filter.is_ok());
        assert_eq!(
            default_directives("warn"),
            "halow_scanner=warn,halowscan=warn"
        );
    }
}
