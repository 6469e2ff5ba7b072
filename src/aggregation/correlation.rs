use crate::aggregation::error::AggregationError;
use crate::table::measurement_table::MeasurementTable;
use crate::types::measurement::Measurement;
use log::debug;
use polars::prelude::*;
use serde::Serialize;

/// Square matrix of pairwise Pearson correlation coefficients.
///
/// `values[i][j]` is the correlation between `columns[i]` and `columns[j]`. The matrix is
/// exactly symmetric. The diagonal is `1.0` for every column with nonzero variance; entries
/// that are undefined (zero variance, or fewer than two complete pairs) are `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    columns: Vec<Measurement>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn columns(&self) -> &[Measurement] {
        &self.columns
    }

    /// Row-major coefficients, one row per entry of [`CorrelationMatrix::columns`].
    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub fn size(&self) -> usize {
        self.columns.len()
    }

    /// The coefficient for a pair of columns, or `None` if either is not in the matrix.
    pub fn get(&self, a: Measurement, b: Measurement) -> Option<f64> {
        let i = self.columns.iter().position(|m| *m == a)?;
        let j = self.columns.iter().position(|m| *m == b)?;
        Some(self.values[i][j])
    }

    /// Wide frame: a `column` name column followed by one coefficient column per measurement.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let mut frame_columns = Vec::with_capacity(self.columns.len() + 1);
        frame_columns.push(Column::new(
            "column".into(),
            self.columns
                .iter()
                .map(|m| m.column_name())
                .collect::<Vec<_>>(),
        ));
        for (j, measurement) in self.columns.iter().enumerate() {
            frame_columns.push(Column::new(
                measurement.column_name().into(),
                self.values.iter().map(|row| row[j]).collect::<Vec<f64>>(),
            ));
        }
        DataFrame::new(frame_columns)
    }

    /// Long frame with columns `x`, `y` and `value`, one row per cell. This is the shape
    /// heatmap plots take.
    pub fn to_long_frame(&self) -> PolarsResult<DataFrame> {
        let n = self.columns.len();
        let mut xs = Vec::with_capacity(n * n);
        let mut ys = Vec::with_capacity(n * n);
        let mut values = Vec::with_capacity(n * n);
        for (i, row_column) in self.columns.iter().enumerate() {
            for (j, column) in self.columns.iter().enumerate() {
                xs.push(column.column_name());
                ys.push(row_column.column_name());
                values.push(self.values[i][j]);
            }
        }
        DataFrame::new(vec![
            Column::new("x".into(), xs),
            Column::new("y".into(), ys),
            Column::new("value".into(), values),
        ])
    }
}

fn variance_alias(i: usize) -> String {
    format!("var_{i}")
}

fn pair_alias(i: usize, j: usize) -> String {
    format!("corr_{i}_{j}")
}

/// Computes the Pearson correlation coefficient between every pair of `columns`.
///
/// Missing values are excluded pairwise: the coefficient for `(a, b)` uses exactly the
/// rows where both `a` and `b` are present, so a gap in `CO` does not shrink the sample
/// used for `(PM2.5, PM10)`. Only the upper triangle is computed; the lower triangle mirrors
/// it. Duplicate entries in `columns` are kept once.
///
/// # Errors
///
/// [`AggregationError::MissingColumn`] if a requested column is not in the table.
///
/// # Example
///
/// ```
/// # use air_quality::{Measurement, MeasurementTable};
/// # use polars::prelude::*;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let table = MeasurementTable::from_frame(df!(
///     "PM2.5" => [1.0, 2.0, 3.0, 4.0],
///     "PM10" => [2.0, 4.0, 6.0, 8.0],
/// )?)?;
///
/// let matrix = table.correlation_matrix(&[Measurement::Pm25, Measurement::Pm10])?;
/// assert_eq!(matrix.get(Measurement::Pm25, Measurement::Pm25), Some(1.0));
/// assert!((matrix.get(Measurement::Pm25, Measurement::Pm10).unwrap() - 1.0).abs() < 1e-12);
/// # Ok(())
/// # }
/// ```
pub fn correlation_matrix(
    table: &MeasurementTable,
    columns: &[Measurement],
) -> Result<CorrelationMatrix, AggregationError> {
    let mut matrix_columns: Vec<Measurement> = Vec::with_capacity(columns.len());
    for column in columns {
        table.require_column(column.column_name())?;
        if !matrix_columns.contains(column) {
            matrix_columns.push(*column);
        }
    }

    let n = matrix_columns.len();
    if n == 0 {
        return Ok(CorrelationMatrix {
            columns: matrix_columns,
            values: Vec::new(),
        });
    }

    let mut statistics = Vec::with_capacity(n + n * (n - 1) / 2);
    for (i, a) in matrix_columns.iter().enumerate() {
        let a = a.column_name();
        statistics.push(col(a).var(1).alias(variance_alias(i)));
        for (j, b) in matrix_columns.iter().enumerate().skip(i + 1) {
            let b = b.column_name();
            let complete = col(a).is_not_null().and(col(b).is_not_null());
            statistics.push(
                pearson_corr(col(a).filter(complete.clone()), col(b).filter(complete))
                    .alias(pair_alias(i, j)),
            );
        }
    }

    let stats = table.lazy().select(statistics).collect()?;
    let scalar = |name: String| -> Result<f64, AggregationError> {
        let value = stats
            .column(&name)?
            .cast(&DataType::Float64)?
            .f64()?
            .get(0);
        Ok(value.unwrap_or(f64::NAN))
    };

    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        let variance = scalar(variance_alias(i))?;
        values[i][i] = if variance > 0.0 { 1.0 } else { f64::NAN };
        for j in (i + 1)..n {
            let r = scalar(pair_alias(i, j))?;
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    debug!("Computed {}x{} correlation matrix", n, n);
    Ok(CorrelationMatrix {
        columns: matrix_columns,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "Expected {expected}, got {actual}"
        );
    }

    fn sample_table() -> Result<MeasurementTable, Box<dyn std::error::Error>> {
        let frame = df!(
            "PM2.5" => [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)],
            "PM10" => [Some(2.0), Some(4.0), Some(6.0), Some(8.0), None],
            "TEMP" => [Some(5.0), Some(3.0), Some(4.0), Some(1.0), Some(2.0)],
            "CO" => [Some(7.0), Some(7.0), Some(7.0), Some(7.0), Some(7.0)],
        )?;
        Ok(MeasurementTable::from_frame(frame)?)
    }

    #[test]
    fn test_symmetric_with_unit_diagonal() -> Result<(), Box<dyn std::error::Error>> {
        let table = sample_table()?;
        let columns = [Measurement::Pm25, Measurement::Pm10, Measurement::Temp];

        let matrix = correlation_matrix(&table, &columns)?;

        assert_eq!(matrix.size(), 3);
        for i in 0..3 {
            assert_eq!(matrix.values()[i][i], 1.0);
            for j in 0..3 {
                assert_eq!(
                    matrix.values()[i][j].to_bits(),
                    matrix.values()[j][i].to_bits()
                );
            }
        }
        Ok(())
    }

    #[test]
    fn test_pairwise_exclusion_of_missing() -> Result<(), Box<dyn std::error::Error>> {
        let table = sample_table()?;

        let matrix = correlation_matrix(&table, &[Measurement::Pm25, Measurement::Pm10])?;

        // The last row has no PM10; on the remaining four rows PM10 = 2 * PM2.5.
        assert_close(
            matrix
                .get(Measurement::Pm25, Measurement::Pm10)
                .ok_or("missing coefficient")?,
            1.0,
        );
        Ok(())
    }

    #[test]
    fn test_hand_computed_coefficient() -> Result<(), Box<dyn std::error::Error>> {
        let table = sample_table()?;

        let matrix = correlation_matrix(&table, &[Measurement::Pm25, Measurement::Temp])?;

        // x = 1..5, y = 5,3,4,1,2, both with mean 3.
        // sum(dx*dy) = (-2)(2) + (-1)(0) + (0)(1) + (1)(-2) + (2)(-1) = -8
        // sum(dx^2) = 10, sum(dy^2) = 10
        assert_close(
            matrix
                .get(Measurement::Temp, Measurement::Pm25)
                .ok_or("missing coefficient")?,
            -0.8,
        );
        Ok(())
    }

    #[test]
    fn test_zero_variance_column_is_undefined() -> Result<(), Box<dyn std::error::Error>> {
        let table = sample_table()?;

        let matrix = correlation_matrix(&table, &[Measurement::Pm25, Measurement::Co])?;

        let co_diagonal = matrix
            .get(Measurement::Co, Measurement::Co)
            .ok_or("missing coefficient")?;
        assert!(co_diagonal.is_nan());
        assert_eq!(matrix.get(Measurement::Pm25, Measurement::Pm25), Some(1.0));
        Ok(())
    }

    #[test]
    fn test_missing_column() -> Result<(), Box<dyn std::error::Error>> {
        let table = sample_table()?;

        let result = correlation_matrix(&table, &Measurement::CORRELATED);
        assert!(matches!(result, Err(AggregationError::MissingColumn(_))));
        Ok(())
    }

    #[test]
    fn test_frames() -> Result<(), Box<dyn std::error::Error>> {
        let table = sample_table()?;
        let matrix = correlation_matrix(&table, &[Measurement::Pm25, Measurement::Temp])?;

        let wide = matrix.to_frame()?;
        assert_eq!(wide.shape(), (2, 3));

        let long = matrix.to_long_frame()?;
        assert_eq!(long.height(), 4);
        let first = long.column("value")?.f64()?.get(0);
        assert_eq!(first, Some(1.0));
        Ok(())
    }
}
