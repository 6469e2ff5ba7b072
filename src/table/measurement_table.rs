// measurement_table.rs

//! Contains the `MeasurementTable`, the in-memory air-quality dataset every view is
//! computed from.

use crate::aggregation::correlation::{correlation_matrix, CorrelationMatrix};
use crate::aggregation::error::AggregationError;
use crate::aggregation::grouped_means::{average_by, GroupedMeans};
use crate::table::error::LoadError;
use crate::types::group_key::GroupKey;
use crate::types::measurement::Measurement;
use bon::bon;
use log::{debug, info, warn};
use polars::prelude::*;
use std::path::{Path, PathBuf};

/// Where the dashboard reads its measurements from when no path is configured.
pub const DEFAULT_DATA_PATH: &str = "/main_data.csv";

/// Cell values treated as missing in addition to empty fields.
pub const DEFAULT_NULL_VALUES: [&str; 1] = ["NA"];

/// The loaded air-quality dataset.
///
/// Rows carry the grouping keys `month`, `year` and `station` plus the numeric
/// [`Measurement`] columns. The table is read-only once loaded: [`MeasurementTable::filter`]
/// returns a new table and every aggregation works on a lazy copy of the frame.
///
/// Loading normalises the known columns so the aggregations see consistent types:
///
/// * measurement columns become nullable `Float64`; unparseable cells and `NaN` become null,
/// * `month` and `year` become `Int64`,
/// * `station` becomes `String`.
///
/// Columns the table does not contain are left out rather than rejected; a view asking for
/// one fails with [`AggregationError::MissingColumn`].
#[derive(Debug, Clone)]
pub struct MeasurementTable {
    /// The underlying Polars DataFrame holding the normalised rows.
    pub frame: DataFrame,
    source: Option<PathBuf>,
}

#[bon]
impl MeasurementTable {
    /// Loads the Measurement Table from a CSV file with a header row.
    ///
    /// The existence of the file is checked before anything is parsed, so a missing source
    /// always surfaces as [`LoadError::SourceFileMissing`].
    ///
    /// Optional builder parameters:
    /// *   `.null_values(Vec<String>)`: Cell values read as missing (default: `["NA"]`).
    /// *   `.infer_schema_length(usize)`: Rows scanned to infer column types. By default
    ///     the whole file is scanned, so a float appearing late in an otherwise integral
    ///     column does not break parsing.
    ///
    /// # Errors
    ///
    /// * [`LoadError::SourceFileMissing`] if `path` does not exist.
    /// * [`LoadError::CsvRead`] if the file is not valid CSV.
    /// * [`LoadError::EmptyTable`] if the file has a header but no rows.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use air_quality::{MeasurementTable, LoadError};
    /// # use std::path::Path;
    /// # fn main() -> Result<(), LoadError> {
    /// let table = MeasurementTable::from_csv(Path::new("data/main_data.csv")).call()?;
    /// println!("{} measurements loaded", table.height());
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = from_csv)]
    #[doc(hidden)]
    pub fn build_from_csv(
        #[builder(start_fn)] path: &Path,
        null_values: Option<Vec<String>>,
        infer_schema_length: Option<usize>,
    ) -> Result<Self, LoadError> {
        match path.try_exists() {
            Ok(true) => {}
            Ok(false) => {
                warn!("Measurement source {} does not exist", path.display());
                return Err(LoadError::SourceFileMissing(path.to_path_buf()));
            }
            Err(e) => return Err(LoadError::SourceMetadata(path.to_path_buf(), e)),
        }

        let null_values = null_values.unwrap_or_else(|| {
            DEFAULT_NULL_VALUES
                .iter()
                .map(|s| s.to_string())
                .collect()
        });
        let null_values =
            NullValues::AllColumns(null_values.into_iter().map(PlSmallStr::from).collect());

        info!("Loading measurements from {}", path.display());
        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(infer_schema_length)
            .map_parse_options(|opts| opts.with_null_values(Some(null_values.clone())))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .map_err(|e| LoadError::CsvRead(path.to_path_buf(), e))?
            .finish()
            .map_err(|e| LoadError::CsvRead(path.to_path_buf(), e))?;

        Self::normalize(frame, Some(path.to_path_buf()))
    }
}

impl MeasurementTable {
    /// Wraps an already materialised DataFrame, applying the same column normalisation
    /// as [`MeasurementTable::from_csv`].
    ///
    /// # Errors
    ///
    /// [`LoadError::EmptyTable`] if `frame` has no rows, [`LoadError::Normalize`] if a
    /// known column cannot be cast.
    pub fn from_frame(frame: DataFrame) -> Result<Self, LoadError> {
        Self::normalize(frame, None)
    }

    fn normalize(frame: DataFrame, source: Option<PathBuf>) -> Result<Self, LoadError> {
        let source_name = describe_source(source.as_deref());
        if frame.height() == 0 {
            return Err(LoadError::EmptyTable(source_name));
        }

        let mut casts = Vec::new();
        for measurement in Measurement::ALL {
            let name = measurement.column_name();
            if frame.get_column_index(name).is_some() {
                casts.push(
                    col(name)
                        .cast(DataType::Float64)
                        .fill_nan(lit(NULL))
                        .alias(name),
                );
            }
        }
        for key in [GroupKey::Month, GroupKey::Year, GroupKey::Station] {
            let name = key.column_name();
            if frame.get_column_index(name).is_some() {
                casts.push(col(name).cast(key.dtype()).alias(name));
            }
        }

        let frame = frame
            .lazy()
            .with_columns(casts)
            .collect()
            .map_err(|e| LoadError::Normalize {
                source_name: source_name.clone(),
                source: e,
            })?;

        debug!(
            "Measurement table from {} has {} rows and {} columns",
            source_name,
            frame.height(),
            frame.width()
        );
        Ok(Self { frame, source })
    }

    /// The file the table was loaded from, if it came from one.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.get_column_index(name).is_some()
    }

    pub(crate) fn require_column(&self, name: &str) -> Result<(), AggregationError> {
        if self.has_column(name) {
            Ok(())
        } else {
            Err(AggregationError::MissingColumn(name.to_string()))
        }
    }

    /// A lazy view over a copy of the rows.
    pub fn lazy(&self) -> LazyFrame {
        self.frame.clone().lazy()
    }

    /// Returns a new table holding only the rows matching `predicate`. The table itself
    /// is left unchanged.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use air_quality::MeasurementTable;
    /// # use polars::prelude::{col, lit};
    /// # use std::path::Path;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let table = MeasurementTable::from_csv(Path::new("data/main_data.csv")).call()?;
    /// let wet_days = table.filter(col("RAIN").gt(lit(0.0)))?;
    /// println!("{} rows with rainfall", wet_days.height());
    /// # Ok(())
    /// # }
    /// ```
    pub fn filter(&self, predicate: Expr) -> Result<MeasurementTable, AggregationError> {
        let frame = self.lazy().filter(predicate).collect()?;
        Ok(MeasurementTable {
            frame,
            source: self.source.clone(),
        })
    }

    /// Mean of each column in `columns` for every distinct value of `key`.
    /// See [`average_by`].
    pub fn average_by(
        &self,
        key: GroupKey,
        columns: &[Measurement],
    ) -> Result<GroupedMeans, AggregationError> {
        average_by(self, key, columns)
    }

    /// Pairwise Pearson correlation of `columns`. See [`correlation_matrix`].
    pub fn correlation_matrix(
        &self,
        columns: &[Measurement],
    ) -> Result<CorrelationMatrix, AggregationError> {
        correlation_matrix(self, columns)
    }
}

fn describe_source(source: Option<&Path>) -> String {
    match source {
        Some(path) => format!("'{}'", path.display()),
        None => "in-memory frame".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE_CSV: &str = "\
No,year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,TEMP,PRES,DEWP,RAIN,wd,WSPM,station
1,2013,3,1,0,4.0,4.0,4.0,7.0,300.0,77.0,-0.7,1023.0,-18.8,0.0,NNW,4.4,Aotizhongxin
2,2013,3,1,1,8,8,NA,7.0,300.0,77.0,-1.1,1023.2,-18.2,0.0,N,4.7,Aotizhongxin
3,2013,3,1,2,7.0,,5.0,10.0,300.0,73.0,-1.1,1023.5,-18.2,0.5,NNW,5.6,Dongsi
";

    fn write_csv(dir: &TempDir, name: &str, contents: &str) -> Result<PathBuf, std::io::Error> {
        let path = dir.path().join(name);
        fs::write(&path, contents)?;
        Ok(path)
    }

    #[test]
    fn test_load_normalises_columns() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = write_csv(&dir, "main_data.csv", SAMPLE_CSV)?;

        let table = MeasurementTable::from_csv(&path).call()?;

        assert_eq!(table.height(), 3);
        assert_eq!(table.source(), Some(path.as_path()));
        assert_eq!(table.frame.column("PM2.5")?.dtype(), &DataType::Float64);
        assert_eq!(table.frame.column("SO2")?.dtype(), &DataType::Float64);
        assert_eq!(table.frame.column("month")?.dtype(), &DataType::Int64);
        assert_eq!(table.frame.column("station")?.dtype(), &DataType::String);

        // "NA" and empty cells are missing values.
        let so2 = table.frame.column("SO2")?.f64()?;
        assert_eq!(so2.get(1), None);
        let pm10 = table.frame.column("PM10")?.f64()?;
        assert_eq!(pm10.get(2), None);
        assert_eq!(pm10.get(1), Some(8.0));
        Ok(())
    }

    #[test]
    fn test_missing_source_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = dir.path().join("does_not_exist.csv");

        match MeasurementTable::from_csv(&path).call() {
            Err(LoadError::SourceFileMissing(reported)) => assert_eq!(reported, path),
            other => panic!("Expected SourceFileMissing, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_header_only_file_is_empty_table() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = write_csv(&dir, "empty.csv", "year,month,station,PM2.5\n")?;

        let result = MeasurementTable::from_csv(&path).call();
        assert!(
            matches!(result, Err(LoadError::EmptyTable(_))),
            "Expected EmptyTable, got {:?}",
            result
        );
        Ok(())
    }

    #[test]
    fn test_custom_null_values() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = write_csv(&dir, "custom.csv", "month,PM2.5\n1,-999\n1,12.5\n")?;

        let table = MeasurementTable::from_csv(&path)
            .null_values(vec!["-999".to_string()])
            .call()?;

        let pm25 = table.frame.column("PM2.5")?.f64()?;
        assert_eq!(pm25.get(0), None);
        assert_eq!(pm25.get(1), Some(12.5));
        Ok(())
    }

    #[test]
    fn test_from_frame_replaces_nan_with_null() -> Result<(), Box<dyn std::error::Error>> {
        let frame = df!(
            "month" => [1i64, 2],
            "TEMP" => [f64::NAN, 3.5],
        )?;

        let table = MeasurementTable::from_frame(frame)?;

        let temp = table.frame.column("TEMP")?.f64()?;
        assert_eq!(temp.get(0), None);
        assert_eq!(temp.get(1), Some(3.5));
        assert_eq!(table.source(), None);
        Ok(())
    }

    #[test]
    fn test_filter_leaves_original_untouched() -> Result<(), Box<dyn std::error::Error>> {
        let frame = df!(
            "station" => ["Dongsi", "Wanliu", "Dongsi"],
            "PM2.5" => [1.0, 2.0, 3.0],
        )?;
        let table = MeasurementTable::from_frame(frame)?;

        let dongsi = table.filter(col("station").eq(lit("Dongsi")))?;

        assert_eq!(dongsi.height(), 2);
        assert_eq!(table.height(), 3);
        Ok(())
    }
}
