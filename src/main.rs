//! air-quality - one dashboard pass over an air-quality measurement CSV.
//!
//! Exit codes:
//!   0 - Success
//!   1 - The source file is missing, or any other error

mod cli;

use air_quality::{
    Dashboard, ExportPresenter, JsonPresenter, LoadError, MeasurementTable, TablePresenter,
};
use anyhow::{Context, Result};
use clap::Parser;
use cli::{Args, OutputFormat};
use log::{debug, error, info, warn};
use polars::prelude::{col, lit};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    info!("air-quality v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Dashboard pass failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging. `RUST_LOG` overrides the level picked with `-v`.
fn init_logging(args: &Args) {
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .format_target(false)
        .parse_default_env()
        .init();
}

fn run(args: &Args) -> Result<()> {
    let table = match MeasurementTable::from_csv(&args.data).call() {
        Ok(table) => table,
        // Reported as-is: the path is the whole message.
        Err(e @ LoadError::SourceFileMissing(_)) => return Err(e.into()),
        Err(e) => {
            return Err(e).with_context(|| {
                format!("Failed to load measurements from {}", args.data.display())
            })
        }
    };

    let table = match &args.station {
        Some(station) => {
            let filtered = table
                .filter(col("station").eq(lit(station.as_str())))
                .context("Failed to filter by station")?;
            if filtered.height() == 0 {
                warn!("No rows for station '{}'", station);
            }
            filtered
        }
        None => table,
    };

    let dashboard = Dashboard::build(&table).context("Failed to compute dashboard views")?;

    match args.format {
        OutputFormat::Table => {
            dashboard.present(&mut TablePresenter::new(io::stdout().lock()))?;
        }
        OutputFormat::Json => {
            let mut presenter = JsonPresenter::new(io::stdout().lock()).pretty(args.pretty);
            dashboard.present(&mut presenter)?;
        }
        OutputFormat::Off => {}
    }

    if let Some(output_dir) = &args.output_dir {
        let mut exporter = ExportPresenter::new(output_dir, args.export.into());
        dashboard
            .present(&mut exporter)
            .with_context(|| format!("Failed to export views to {}", output_dir.display()))?;
        info!(
            "Wrote {} view file(s) to {}",
            exporter.written().len(),
            output_dir.display()
        );
    }

    Ok(())
}
