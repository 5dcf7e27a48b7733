use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "isd-lite-processor")]
#[command(about = "Decode NOAA ISD-Lite station files and disaggregate precipitation accumulations")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Configuration file [default: isd-lite.toml]")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a disaggregated, projected table for a set of stations
    Process(ProcessArgs),

    /// Resolve call signs and list the yearly source files for a time range
    Stations(StationsArgs),

    /// Decode and disaggregate a single .isd file
    Inspect(InspectArgs),
}

/// Station call signs given inline or in a file (one per line)
#[derive(Args, Debug, Clone, Default)]
pub struct StationSelection {
    #[arg(short, long = "station", help = "Station call sign, e.g. KRDU (repeatable)")]
    pub stations: Vec<String>,

    #[arg(long, help = "File with one station call sign per line")]
    pub stations_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct TimeRangeArgs {
    #[arg(long, help = "Range start, YYYYMMDD_HH (inclusive)")]
    pub start: String,

    #[arg(long, help = "Range end, YYYYMMDD_HH (inclusive)")]
    pub end: String,
}

#[derive(Args, Debug, Clone)]
pub struct ProcessArgs {
    #[command(flatten)]
    pub selection: StationSelection,

    #[arg(
        long = "variable",
        help = "Variable display name, or \"Precip\" for all precipitation columns (repeatable)"
    )]
    pub variables: Vec<String>,

    #[arg(long, help = "File with one variable name per line")]
    pub variables_file: Option<PathBuf>,

    #[command(flatten)]
    pub range: TimeRangeArgs,

    #[arg(long, help = "Directory of decompressed .isd files")]
    pub data_dir: Option<PathBuf>,

    #[arg(long, help = "Path to isd-history.txt")]
    pub station_history: Option<PathBuf>,

    #[arg(short, long, help = "Output file (.csv or .parquet)")]
    pub output: PathBuf,

    #[arg(long)]
    pub max_workers: Option<usize>,

    #[arg(short, long, help = "Parquet compression: snappy, gzip, lz4, zstd, none")]
    pub compression: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct StationsArgs {
    #[command(flatten)]
    pub selection: StationSelection,

    #[command(flatten)]
    pub range: TimeRangeArgs,

    #[arg(long, help = "Path to isd-history.txt")]
    pub station_history: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[arg(short, long, help = "Decompressed .isd file")]
    pub file: PathBuf,

    #[arg(short, long, default_value = "10", help = "Rows to print")]
    pub rows: usize,

    #[arg(long = "variable", help = "Variables to print [default: all]")]
    pub variables: Vec<String>,
}
