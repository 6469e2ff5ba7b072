//! Command-line interface argument parsing.

use air_quality::{ExportFormat, DEFAULT_DATA_PATH};
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

/// Air-quality dashboard - grouped pollutant averages and correlations
///
/// Loads a measurement CSV, computes the five dashboard views (monthly, yearly,
/// correlation, per station, per rainfall amount) and prints or exports them.
///
/// Examples:
///   air-quality
///   air-quality --data ./PRSA_Data_merged.csv --format json
///   air-quality --data ./main_data.csv --output-dir views --export parquet
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Measurement CSV to load
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = DEFAULT_DATA_PATH,
        env = "AIR_QUALITY_DATA"
    )]
    pub data: PathBuf,

    /// How to print the views on stdout
    #[arg(long, default_value = "table", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Also write each view's data to this directory
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// File format for --output-dir
    #[arg(long, default_value = "csv", value_name = "FORMAT")]
    pub export: ExportArg,

    /// Only use the rows of this station
    #[arg(long, value_name = "STATION")]
    pub station: Option<String>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Output format for stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Formatted tables (default)
    #[default]
    Table,
    /// One JSON document
    Json,
    /// Print nothing; useful with --output-dir
    Off,
}

/// File format for exported views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportArg {
    #[default]
    Csv,
    Parquet,
}

impl From<ExportArg> for ExportFormat {
    fn from(value: ExportArg) -> Self {
        match value {
            ExportArg::Csv => ExportFormat::Csv,
            ExportArg::Parquet => ExportFormat::Parquet,
        }
    }
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["air-quality"]);
        if std::env::var_os("AIR_QUALITY_DATA").is_none() {
            assert_eq!(args.data, PathBuf::from(DEFAULT_DATA_PATH));
        }
        assert_eq!(args.format, OutputFormat::Table);
        assert_eq!(args.export, ExportArg::Csv);
        assert_eq!(args.log_level(), LevelFilter::Warn);
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "air-quality",
            "--data",
            "data.csv",
            "--format",
            "json",
            "--output-dir",
            "out",
            "--export",
            "parquet",
            "--station",
            "Dongsi",
            "-vv",
        ]);
        assert_eq!(args.data, PathBuf::from("data.csv"));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
        assert_eq!(ExportFormat::from(args.export), ExportFormat::Parquet);
        assert_eq!(args.station.as_deref(), Some("Dongsi"));
        assert_eq!(args.log_level(), LevelFilter::Debug);
    }
}
