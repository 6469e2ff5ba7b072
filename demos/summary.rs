//! Prints a few grouped averages and the pollutant correlation matrix of a measurement CSV.
//!
//! cargo run --example summary -- path/to/main_data.csv

use air_quality::{GroupKey, GroupValue, Measurement, MeasurementTable, DEFAULT_DATA_PATH};
use std::env;
use std::error::Error;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    configure_polars_display();
    let path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

    let table = MeasurementTable::from_csv(&path).call()?;
    println!("Loaded {} rows from {}", table.height(), path.display());

    // --- Monthly PM2.5 ---
    let monthly = table.average_by(GroupKey::Month, &[Measurement::Pm25])?;
    for month in 1..=12_i64 {
        match monthly.get(&GroupValue::from(month), Measurement::Pm25) {
            Some(mean) => println!("Month {:>2}: {:>8.2} µg/m³", month, mean),
            None => println!("Month {:>2}: no data", month),
        }
    }

    // --- Station ranking by PM10 ---
    let by_station = table.average_by(GroupKey::Station, &[Measurement::Pm10])?;
    let mut ranking: Vec<(String, f64)> = by_station
        .groups()
        .iter()
        .filter_map(|(station, means)| {
            means
                .get(&Measurement::Pm10)
                .copied()
                .flatten()
                .map(|mean| (station.to_string(), mean))
        })
        .collect();
    ranking.sort_by(|a, b| b.1.total_cmp(&a.1));
    println!("\nStations by average PM10:");
    for (station, mean) in ranking {
        println!("  {:<16} {:>8.2}", station, mean);
    }

    // --- Correlation ---
    let matrix = table.correlation_matrix(&Measurement::CORRELATED)?;
    println!("\n{}", matrix.to_frame()?);

    Ok(())
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    // show 20 rows
    env::set_var("POLARS_FMT_MAX_ROWS", "20");
}
