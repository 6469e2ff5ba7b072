use crate::aggregation::error::AggregationError;
use crate::table::measurement_table::MeasurementTable;
use crate::types::group_key::GroupKey;
use crate::types::group_value::GroupValue;
use crate::types::measurement::Measurement;
use log::debug;
use polars::prelude::*;
use std::collections::BTreeMap;

/// The result of [`average_by`]: one entry per distinct key value, each mapping the
/// requested columns to their mean.
///
/// A mean is `None` when every value of that column in the group was missing.
#[derive(Debug, Clone)]
pub struct GroupedMeans {
    key: GroupKey,
    columns: Vec<Measurement>,
    groups: BTreeMap<GroupValue, BTreeMap<Measurement, Option<f64>>>,
    frame: DataFrame,
}

impl GroupedMeans {
    pub fn key(&self) -> GroupKey {
        self.key
    }

    /// The averaged columns, in request order.
    pub fn columns(&self) -> &[Measurement] {
        &self.columns
    }

    /// Group key value -> column -> mean, ordered by key.
    pub fn groups(&self) -> &BTreeMap<GroupValue, BTreeMap<Measurement, Option<f64>>> {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The mean of `column` for the group `key`, or `None` if either is unknown or the
    /// group has no values for that column.
    pub fn get(&self, key: &GroupValue, column: Measurement) -> Option<f64> {
        self.groups
            .get(key)
            .and_then(|means| means.get(&column))
            .copied()
            .flatten()
    }

    /// Wide frame: the key column followed by one mean column per measurement, sorted by key.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Long frame with columns `key` (as text), `measurement` and `mean`; one row per
    /// group and column. Grouped bar charts usually want this shape.
    pub fn to_long_frame(&self) -> PolarsResult<DataFrame> {
        let capacity = self.groups.len() * self.columns.len();
        let mut keys = Vec::with_capacity(capacity);
        let mut measurements = Vec::with_capacity(capacity);
        let mut means = Vec::with_capacity(capacity);

        for (key, row) in &self.groups {
            for column in &self.columns {
                keys.push(key.to_string());
                measurements.push(column.column_name());
                means.push(row.get(column).copied().flatten());
            }
        }

        DataFrame::new(vec![
            Column::new("key".into(), keys),
            Column::new("measurement".into(), measurements),
            Column::new("mean".into(), means),
        ])
    }
}

/// Computes, for each distinct value of `key`, the arithmetic mean of each column in
/// `columns` across the rows sharing that value.
///
/// Missing values are skipped per column: a row with no `PM10` still counts towards the
/// group's `PM2.5` mean. Rows whose key is missing do not form a group. Duplicate entries
/// in `columns` are averaged once.
///
/// # Errors
///
/// * [`AggregationError::MissingColumn`] if the key or a value column is absent.
/// * [`AggregationError::KeyInValues`] if `columns` contains the key column itself.
/// * [`AggregationError::UnsupportedKeyType`] if the key column cannot be used as a key.
///
/// # Example
///
/// ```
/// # use air_quality::{GroupKey, GroupValue, Measurement, MeasurementTable};
/// # use polars::prelude::*;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let table = MeasurementTable::from_frame(df!(
///     "month" => [1i64, 1, 2],
///     "PM2.5" => [10.0, 20.0, 30.0],
/// )?)?;
///
/// let monthly = table.average_by(GroupKey::Month, &[Measurement::Pm25])?;
/// assert_eq!(monthly.get(&GroupValue::from(1_i64), Measurement::Pm25), Some(15.0));
/// assert_eq!(monthly.get(&GroupValue::from(2_i64), Measurement::Pm25), Some(30.0));
/// # Ok(())
/// # }
/// ```
pub fn average_by(
    table: &MeasurementTable,
    key: GroupKey,
    columns: &[Measurement],
) -> Result<GroupedMeans, AggregationError> {
    let key_name = key.column_name();
    table.require_column(key_name)?;

    let mut value_columns: Vec<Measurement> = Vec::with_capacity(columns.len());
    for column in columns {
        if column.column_name() == key_name {
            return Err(AggregationError::KeyInValues(key_name.to_string()));
        }
        table.require_column(column.column_name())?;
        if !value_columns.contains(column) {
            value_columns.push(*column);
        }
    }

    let aggregations: Vec<Expr> = value_columns
        .iter()
        .map(|m| col(m.column_name()).mean().alias(m.column_name()))
        .collect();

    let frame = table
        .lazy()
        .filter(col(key_name).is_not_null())
        .group_by([col(key_name)])
        .agg(aggregations)
        .sort([key_name], SortMultipleOptions::default())
        .collect()?;

    let key_column = frame.column(key_name)?;
    let mean_columns = value_columns
        .iter()
        .map(|m| Ok((*m, frame.column(m.column_name())?.f64()?)))
        .collect::<PolarsResult<Vec<_>>>()?;

    let mut groups = BTreeMap::new();
    for row in 0..frame.height() {
        let raw = key_column.get(row)?;
        let value =
            GroupValue::from_any_value(&raw).ok_or_else(|| AggregationError::UnsupportedKeyType {
                column: key_name.to_string(),
                dtype: key_column.dtype().to_string(),
            })?;
        let means = mean_columns
            .iter()
            .map(|(m, values)| (*m, values.get(row)))
            .collect();
        groups.insert(value, means);
    }

    debug!(
        "Averaged {} column(s) over {} group(s) of '{}'",
        value_columns.len(),
        groups.len(),
        key_name
    );

    Ok(GroupedMeans {
        key,
        columns: value_columns,
        groups,
        frame,
    })
}
