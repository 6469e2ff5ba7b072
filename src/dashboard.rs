//! The five views of the air-quality dashboard and the code that computes them.
//!
//! A [`Dashboard`] is built in one pass over a [`MeasurementTable`]; each [`View`] pairs the
//! chart metadata of its [`ViewDefinition`] with the computed numbers. Handing views to a
//! chart library is the job of a [`crate::Presenter`].

use crate::aggregation::correlation::CorrelationMatrix;
use crate::aggregation::error::AggregationError;
use crate::aggregation::grouped_means::GroupedMeans;
use crate::error::AirQualityError;
use crate::presenter::{PresentError, Presenter};
use crate::table::measurement_table::MeasurementTable;
use crate::types::chart::{ChartKind, ChartSpec};
use crate::types::group_key::GroupKey;
use crate::types::measurement::Measurement;
use log::info;
use polars::prelude::{DataFrame, PolarsResult};
use std::path::Path;

const CONCENTRATION_LABEL: &str = "Average Concentration (µg/m³)";

/// What a view computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewQuery {
    /// Grouped means of `columns` keyed on `key`.
    AverageBy {
        key: GroupKey,
        columns: &'static [Measurement],
    },
    /// Pearson correlation matrix of `columns`.
    Correlation { columns: &'static [Measurement] },
}

/// A dashboard entry before it is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewDefinition {
    /// Stable identifier, used for export file names.
    pub slug: &'static str,
    pub chart: ChartSpec,
    pub query: ViewQuery,
}

/// The dashboard's views, in display order.
pub const STANDARD_VIEWS: [ViewDefinition; 5] = [
    ViewDefinition {
        slug: "monthly_average",
        chart: ChartSpec {
            title: "Monthly Average Air Quality Levels",
            kind: ChartKind::Bar,
            x_label: Some("Month"),
            y_label: Some(CONCENTRATION_LABEL),
        },
        query: ViewQuery::AverageBy {
            key: GroupKey::Month,
            columns: &Measurement::POLLUTANTS,
        },
    },
    ViewDefinition {
        slug: "yearly_average",
        chart: ChartSpec {
            title: "Yearly Average PM2.5, PM10, and Temperature",
            kind: ChartKind::Line,
            x_label: Some("Year"),
            y_label: Some("Average Concentration / Temperature"),
        },
        query: ViewQuery::AverageBy {
            key: GroupKey::Year,
            columns: &[Measurement::Pm25, Measurement::Pm10, Measurement::Temp],
        },
    },
    ViewDefinition {
        slug: "pollutant_correlation",
        chart: ChartSpec {
            title: "Correlation Between Air Quality Pollutants and Temperature",
            kind: ChartKind::Heatmap,
            x_label: None,
            y_label: None,
        },
        query: ViewQuery::Correlation {
            columns: &Measurement::CORRELATED,
        },
    },
    ViewDefinition {
        slug: "station_average",
        chart: ChartSpec {
            title: "Average Pollutant Levels by Station",
            kind: ChartKind::Bar,
            x_label: Some("Station"),
            y_label: Some(CONCENTRATION_LABEL),
        },
        query: ViewQuery::AverageBy {
            key: GroupKey::Station,
            columns: &Measurement::POLLUTANTS,
        },
    },
    ViewDefinition {
        slug: "rainfall_average",
        chart: ChartSpec {
            title: "Average Pollutants Levels Based on Rainfall",
            kind: ChartKind::Line,
            x_label: Some("Rain (mm)"),
            y_label: Some(CONCENTRATION_LABEL),
        },
        query: ViewQuery::AverageBy {
            key: GroupKey::Rain,
            columns: &Measurement::POLLUTANTS,
        },
    },
];

/// The numbers behind a view.
#[derive(Debug, Clone)]
pub enum ViewData {
    GroupedMeans(GroupedMeans),
    Correlation(CorrelationMatrix),
}

impl ViewData {
    /// The view's data as a wide DataFrame.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        match self {
            ViewData::GroupedMeans(means) => Ok(means.frame().clone()),
            ViewData::Correlation(matrix) => matrix.to_frame(),
        }
    }
}

/// A computed dashboard entry.
#[derive(Debug, Clone)]
pub struct View {
    pub slug: &'static str,
    pub chart: ChartSpec,
    pub data: ViewData,
}

impl ViewDefinition {
    /// Runs this definition's query against `table`.
    pub fn compute(&self, table: &MeasurementTable) -> Result<View, AggregationError> {
        let data = match self.query {
            ViewQuery::AverageBy { key, columns } => {
                ViewData::GroupedMeans(table.average_by(key, columns)?)
            }
            ViewQuery::Correlation { columns } => {
                ViewData::Correlation(table.correlation_matrix(columns)?)
            }
        };
        Ok(View {
            slug: self.slug,
            chart: self.chart,
            data,
        })
    }
}

/// All computed views of one dashboard pass.
#[derive(Debug, Clone)]
pub struct Dashboard {
    views: Vec<View>,
}

impl Dashboard {
    /// Computes the [`STANDARD_VIEWS`].
    ///
    /// The first view that fails aborts the build; there is no partial dashboard.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use air_quality::{Dashboard, MeasurementTable, TablePresenter};
    /// # use std::path::Path;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let table = MeasurementTable::from_csv(Path::new("/main_data.csv")).call()?;
    /// let dashboard = Dashboard::build(&table)?;
    /// dashboard.present(&mut TablePresenter::new(std::io::stdout()))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(table: &MeasurementTable) -> Result<Self, AggregationError> {
        Self::from_definitions(table, &STANDARD_VIEWS)
    }

    /// Computes an arbitrary list of view definitions, in order.
    pub fn from_definitions(
        table: &MeasurementTable,
        definitions: &[ViewDefinition],
    ) -> Result<Self, AggregationError> {
        let views = definitions
            .iter()
            .map(|definition| definition.compute(table))
            .collect::<Result<Vec<_>, _>>()?;
        info!(
            "Built dashboard with {} views over {} rows",
            views.len(),
            table.height()
        );
        Ok(Self { views })
    }

    pub fn views(&self) -> &[View] {
        &self.views
    }

    pub fn view(&self, slug: &str) -> Option<&View> {
        self.views.iter().find(|view| view.slug == slug)
    }

    /// Hands every view to `presenter`, in order, then lets it finish.
    pub fn present<P: Presenter>(&self, presenter: &mut P) -> Result<(), PresentError> {
        for view in &self.views {
            presenter.present(view)?;
        }
        presenter.finish()
    }
}

/// Runs one dashboard pass: loads the CSV at `path`, computes the [`STANDARD_VIEWS`] and
/// hands them to `presenter`.
///
/// A missing source file stops the pass before any view is computed or presented.
pub fn render_dashboard<P: Presenter>(
    path: &Path,
    presenter: &mut P,
) -> Result<Dashboard, AirQualityError> {
    let table = MeasurementTable::from_csv(path).call()?;
    let dashboard = Dashboard::build(&table)?;
    dashboard.present(presenter)?;
    Ok(dashboard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::error::LoadError;
    use crate::types::group_value::GroupValue;
    use polars::prelude::*;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingPresenter {
        slugs: Vec<&'static str>,
        finished: bool,
    }

    impl Presenter for RecordingPresenter {
        fn present(&mut self, view: &View) -> Result<(), PresentError> {
            self.slugs.push(view.slug);
            Ok(())
        }

        fn finish(&mut self) -> Result<(), PresentError> {
            self.finished = true;
            Ok(())
        }
    }

    fn full_table() -> Result<MeasurementTable, Box<dyn std::error::Error>> {
        let frame = df!(
            "year" => [2013i64, 2013, 2014, 2014],
            "month" => [3i64, 4, 3, 4],
            "station" => ["Dongsi", "Wanliu", "Wanliu", "Dongsi"],
            "RAIN" => [0.0, 0.0, 0.3, 0.0],
            "PM2.5" => [10.0, 20.0, 30.0, 40.0],
            "PM10" => [15.0, 25.0, 35.0, 60.0],
            "SO2" => [Some(4.0), None, Some(8.0), Some(6.0)],
            "NO2" => [20.0, 22.0, 30.0, 28.0],
            "CO" => [300.0, 500.0, 700.0, 600.0],
            "O3" => [70.0, 50.0, 40.0, 20.0],
            "TEMP" => [-1.0, 12.0, 2.0, 14.0],
        )?;
        Ok(MeasurementTable::from_frame(frame)?)
    }

    #[test]
    fn test_build_has_five_views_in_order() -> Result<(), Box<dyn std::error::Error>> {
        let table = full_table()?;

        let dashboard = Dashboard::build(&table)?;

        let titles: Vec<&str> = dashboard.views().iter().map(|v| v.chart.title).collect();
        assert_eq!(
            titles,
            [
                "Monthly Average Air Quality Levels",
                "Yearly Average PM2.5, PM10, and Temperature",
                "Correlation Between Air Quality Pollutants and Temperature",
                "Average Pollutant Levels by Station",
                "Average Pollutants Levels Based on Rainfall",
            ]
        );
        Ok(())
    }

    #[test]
    fn test_view_contents() -> Result<(), Box<dyn std::error::Error>> {
        let table = full_table()?;
        let dashboard = Dashboard::build(&table)?;

        let rainfall = dashboard.view("rainfall_average").ok_or("missing view")?;
        match &rainfall.data {
            ViewData::GroupedMeans(means) => {
                assert_eq!(means.key(), GroupKey::Rain);
                assert_eq!(means.len(), 2);
                // Dry rows: 10, 20, 40
                let dry = means
                    .get(&GroupValue::from(0.0), Measurement::Pm25)
                    .ok_or("missing mean")?;
                assert!((dry - 70.0 / 3.0).abs() < 1e-9);
            }
            other => panic!("Expected grouped means, got {:?}", other),
        }

        let heatmap = dashboard
            .view("pollutant_correlation")
            .ok_or("missing view")?;
        match &heatmap.data {
            ViewData::Correlation(matrix) => assert_eq!(matrix.size(), 7),
            other => panic!("Expected correlation matrix, got {:?}", other),
        }
        assert_eq!(heatmap.chart.kind, ChartKind::Heatmap);
        Ok(())
    }

    #[test]
    fn test_build_fails_without_partial_output() -> Result<(), Box<dyn std::error::Error>> {
        let table = full_table()?;
        let without_station = MeasurementTable::from_frame(table.frame.drop("station")?)?;

        let result = Dashboard::build(&without_station);

        match result {
            Err(AggregationError::MissingColumn(name)) => assert_eq!(name, "station"),
            other => panic!("Expected MissingColumn, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_custom_definitions() -> Result<(), Box<dyn std::error::Error>> {
        let table = full_table()?;

        let dashboard = Dashboard::from_definitions(&table, &STANDARD_VIEWS[1..2])?;

        assert_eq!(dashboard.views().len(), 1);
        let frame = dashboard.views()[0].data.to_frame()?;
        assert_eq!(frame.shape(), (2, 4));
        Ok(())
    }

    #[test]
    fn test_render_missing_source_presents_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = dir.path().join("main_data.csv");
        let mut presenter = RecordingPresenter::default();

        let result = render_dashboard(&path, &mut presenter);

        assert!(matches!(
            result,
            Err(AirQualityError::Load(LoadError::SourceFileMissing(_)))
        ));
        assert!(presenter.slugs.is_empty());
        assert!(!presenter.finished);
        Ok(())
    }

    #[test]
    fn test_render_presents_every_view() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = dir.path().join("main_data.csv");
        std::fs::write(
            &path,
            "year,month,station,RAIN,PM2.5,PM10,SO2,NO2,CO,O3,TEMP\n\
             2013,3,Dongsi,0.0,10,15,4,20,300,70,-1.0\n\
             2013,4,Wanliu,0.1,20,25,NA,22,500,50,12.0\n\
             2014,3,Wanliu,0.0,30,35,8,30,700,40,2.0\n",
        )?;
        let mut presenter = RecordingPresenter::default();

        let dashboard = render_dashboard(&path, &mut presenter)?;

        assert_eq!(dashboard.views().len(), 5);
        assert_eq!(
            presenter.slugs,
            [
                "monthly_average",
                "yearly_average",
                "pollutant_correlation",
                "station_average",
                "rainfall_average",
            ]
        );
        assert!(presenter.finished);
        Ok(())
    }
}
