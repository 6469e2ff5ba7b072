//! demos/plot_dashboard.rs
//!
//! This demo computes the air-quality dashboard and renders every view with the
//! `plotlars` crate, which opens each chart in the browser.
//!
//! To run this demo:
//! cargo run --example plot_dashboard --features plotting -- path/to/main_data.csv

use std::error::Error;
use std::path::PathBuf;

use air_quality::{
    ChartKind, Dashboard, MeasurementTable, PresentError, Presenter, View, ViewData,
    DEFAULT_DATA_PATH,
};
use plotlars::{BarPlot, HeatMap, Plot, Text, TimeSeriesPlot};
use polars::prelude::PolarsError;

fn main() -> Result<(), Box<dyn Error>> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

    // 1. Load the measurements
    println!("Loading measurements from {}...", path.display());
    let table = MeasurementTable::from_csv(&path).call()?;

    // 2. Compute the five views
    let dashboard = Dashboard::build(&table)?;

    // 3. Plot them
    println!("Rendering {} charts...", dashboard.views().len());
    dashboard.present(&mut PlotlarsPresenter)?;
    println!("Charts shown in browser.");

    Ok(())
}

// --- Plotting presenter ---

struct PlotlarsPresenter;

impl Presenter for PlotlarsPresenter {
    fn present(&mut self, view: &View) -> Result<(), PresentError> {
        let frame_error = |e: PolarsError| PresentError::Frame {
            slug: view.slug.to_string(),
            source: e,
        };
        let title = Text::from(view.chart.title).font("Arial").size(18);
        let x_title = view.chart.x_label.unwrap_or_default();
        let y_title = view.chart.y_label.unwrap_or_default();

        match (&view.data, view.chart.kind) {
            (ViewData::GroupedMeans(means), ChartKind::Bar) => {
                let data = means.to_long_frame().map_err(frame_error)?;
                BarPlot::builder()
                    .data(&data)
                    .labels("key")
                    .values("mean")
                    .group("measurement")
                    .plot_title(title)
                    .x_title(x_title)
                    .y_title(y_title)
                    .build()
                    .plot();
            }
            (ViewData::GroupedMeans(means), _) => {
                let names: Vec<&str> = means.columns().iter().map(|m| m.column_name()).collect();
                let Some((first, rest)) = names.split_first() else {
                    return Ok(());
                };
                TimeSeriesPlot::builder()
                    .data(means.frame())
                    .x(means.key().column_name())
                    .y(*first)
                    .additional_series(rest.to_vec())
                    .plot_title(title)
                    .x_title(x_title)
                    .y_title(y_title)
                    .build()
                    .plot();
            }
            (ViewData::Correlation(matrix), _) => {
                let data = matrix.to_long_frame().map_err(frame_error)?;
                HeatMap::builder()
                    .data(&data)
                    .x("x")
                    .y("y")
                    .z("value")
                    .plot_title(title)
                    .build()
                    .plot();
            }
        }
        Ok(())
    }
}
