use crate::cli::args::{Cli, Commands, InspectArgs, ProcessArgs, StationSelection, StationsArgs};
use crate::config::ProcessorConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{AccumulationWindow, StationSeries, TimeRange, Variable};
use crate::processors::{ParallelProcessor, PrecipDisaggregator, VariableProjector};
use crate::readers::{IsdLiteReader, StationRegistry};
use crate::utils::filename::source_file_names;
use crate::utils::progress::ProgressReporter;
use crate::writers::{write_frame, CsvWriter, OutputFormat, ParquetWriter};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

pub async fn run(cli: Cli) -> Result<()> {
    setup_logging(cli.verbose, cli.log_file.as_deref())?;

    let config = ProcessorConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Process(args) => run_process(args, config).await,
        Commands::Stations(args) => run_stations(args, config),
        Commands::Inspect(args) => run_inspect(args, config),
    }
}

/// Initialise tracing: `RUST_LOG` if set, otherwise info (debug with
/// `--verbose`) for this crate, on stderr and optionally a log file
pub fn setup_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("isd_lite_processor={}", log_level)));

    let file_layer = match log_file {
        Some(path) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(File::create(path)?)),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .try_init()
        .map_err(|e| ProcessingError::Config(format!("Failed to initialise logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

async fn run_process(args: ProcessArgs, config: ProcessorConfig) -> Result<()> {
    let mut config = config;
    if let Some(data_dir) = args.data_dir {
        config = config.with_data_dir(data_dir);
    }
    if let Some(path) = args.station_history {
        config = config.with_station_history(path);
    }
    if let Some(max_workers) = args.max_workers {
        config = config.with_max_workers(max_workers);
    }
    if let Some(compression) = args.compression {
        config.compression = compression;
    }
    config.validate_settings()?;

    // Fail on a bad output path before doing any work
    OutputFormat::from_path(&args.output)?;

    let stations = resolve_stations(&args.selection)?;
    let mut variables = args.variables;
    if let Some(path) = &args.variables_file {
        variables.extend(read_list_file(path)?);
    }
    let range = TimeRange::parse(&args.range.start, &args.range.end)?;
    let output = args.output;

    println!("Processing ISD-Lite data...");
    println!("Data directory: {}", config.data_dir.display());
    println!("Stations: {}", stations.join(", "));
    println!("Time range: {}", range);
    println!("Output file: {}", output.display());

    let report = tokio::task::spawn_blocking(move || -> Result<_> {
        let registry = StationRegistry::from_file(&config.station_history)?;
        info!(stations = registry.len(), "Loaded station history");

        let projector = VariableProjector::new(&variables);
        let progress = ProgressReporter::new(stations.len() as u64, "Processing stations...", false);

        let processor =
            ParallelProcessor::new(config.max_workers, &config.data_dir).with_mmap(config.use_mmap);
        let (frame, report) =
            processor.process_stations(&registry, &stations, &projector, &range, Some(&progress))?;

        println!("Writing {} rows to {}...", frame.len(), output.display());
        write_frame(&frame, &output, &config)?;

        if OutputFormat::from_path(&output)? == OutputFormat::Parquet && output.exists() {
            let file_info = ParquetWriter::new()
                .with_compression(&config.compression)?
                .get_file_info(&output)?;
            println!("\n{}", file_info.summary());
        }

        Ok(report)
    })
    .await??;

    println!("\n{}", report.generate_summary());
    println!("Processing complete!");
    Ok(())
}

fn run_stations(args: StationsArgs, config: ProcessorConfig) -> Result<()> {
    let history = args.station_history.unwrap_or(config.station_history);
    let registry = StationRegistry::from_file(&history)?;
    let range = TimeRange::parse(&args.range.start, &args.range.end)?;

    for station in resolve_stations(&args.selection)? {
        match registry.get(&station) {
            Some(metadata) => {
                println!(
                    "{} ({}): {}, {} {}",
                    station, metadata.ids, metadata.name, metadata.state, metadata.country
                );
                if !metadata.overlaps(range.start.date(), range.end.date()) {
                    println!("  period of record does not cover {}", range);
                }
                for name in source_file_names(&registry, &[station.as_str()], &range) {
                    println!("  {}", name);
                }
            }
            None => println!("{}: not found in {}", station, history.display()),
        }
    }

    Ok(())
}

fn run_inspect(args: InspectArgs, config: ProcessorConfig) -> Result<()> {
    let records = IsdLiteReader::with_mmap(config.use_mmap).read_file(&args.file)?;
    let label = args
        .file
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let series = StationSeries::new(label, records);
    let raw_accumulations = series.accumulation_count();
    let disaggregated = PrecipDisaggregator::new().disaggregate_owned(series);

    println!("File: {}", args.file.display());
    println!("Rows: {}", disaggregated.len());
    println!("Six-hour field reports: {}", raw_accumulations);
    for window in [
        AccumulationWindow::ThreeHour,
        AccumulationWindow::SixHour,
        AccumulationWindow::TwelveHour,
        AccumulationWindow::Other,
    ] {
        println!("  {}: {}", window, disaggregated.window_count(window));
    }

    if args.rows == 0 || disaggregated.is_empty() {
        return Ok(());
    }

    let variables = if args.variables.is_empty() {
        Variable::ALL
            .iter()
            .map(|v| v.display_name().to_string())
            .collect()
    } else {
        args.variables
    };
    let projector = VariableProjector::new(&variables);

    let mut head = disaggregated;
    head.records.truncate(args.rows);

    println!();
    CsvWriter::new().write_to(&projector.project_series(&head), std::io::stdout().lock())?;
    Ok(())
}

/// Inline stations followed by those listed in the stations file
fn resolve_stations(selection: &StationSelection) -> Result<Vec<String>> {
    let mut stations = selection.stations.clone();
    if let Some(path) = &selection.stations_file {
        stations.extend(read_list_file(path)?);
    }

    if stations.is_empty() {
        return Err(ProcessingError::Config(
            "No stations given; use --station or --stations-file".to_string(),
        ));
    }
    Ok(stations)
}

/// One entry per line; blank lines and `#` comments are ignored
pub fn read_list_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
