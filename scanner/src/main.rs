// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

// STD LIB
use std::process::ExitCode;

// THIRD PARTY CRATES
use clap::Parser;
use tracing::{error, info, warn};

// LOCAL CRATES
use halow_scanner::catalog::{load_catalog, Catalog};
use halow_scanner::device::{self, SampleSource};
use halow_scanner::error::ScanError;
use halow_scanner::logging::init_logging;
use halow_scanner::measure::{measure_channel, validate_request};
use halow_scanner::report::{print_catalog, print_measurement, print_results};
use halow_scanner::scan::{scan_all_bandwidths, scan_bandwidth, Interrupt, ScanContext};
use halow_scanner::spectrum::{SpectrumContext, SpectrumParams};
use halow_scanner::Cli;

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Cli::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Cli) -> Result<(), ScanError> {
    // Catalog problems are fatal before any hardware is touched.
    let catalog = load_catalog(&args.channels_csv, &args.region)?;

    if args.list_channels {
        print_catalog(&catalog)?;
        return Ok(());
    }

    let params = SpectrumParams::new(args)?;
    args.sample_rate_hz()?;
    if let Some(channel) = args.channel {
        validate_request(&catalog, channel, args.bandwidth_mhz())?;
    }

    let mut source = device::open(args)?;

    let interrupt = Interrupt::new();
    let handler_flag = interrupt.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_flag.trigger()) {
        warn!("Could not install the Ctrl-C handler: {}", e);
    }

    let ctx = ScanContext::new(SpectrumContext::new(params), args.verbose());
    let outcome = execute(&mut source, &catalog, args, &ctx, &interrupt);

    source.close();
    info!("Receiver closed");
    outcome
}

fn execute(
    source: &mut Box<dyn SampleSource>,
    catalog: &Catalog,
    args: &Cli,
    ctx: &ScanContext,
    interrupt: &Interrupt,
) -> Result<(), ScanError> {
    if let Some(channel) = args.channel {
        let measurement =
            measure_channel(source, catalog, channel, args.bandwidth_mhz(), &ctx.spectrum)
                .map_err(|e| ScanError::Measure { channel, source: e })?;
        print_measurement(&measurement)?;
        return Ok(());
    }

    let reports = if args.all_bandwidths {
        scan_all_bandwidths(source, catalog, ctx, interrupt)
    } else {
        vec![scan_bandwidth(source, catalog, args.bandwidth_mhz(), ctx, interrupt)]
    };

    for report in &reports {
        print_results(report, catalog.region())?;
    }
    if interrupt.is_triggered() {
        info!("Scan interrupted by user");
    }
    Ok(())
}
