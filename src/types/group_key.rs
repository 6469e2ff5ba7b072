//! Defines the columns a grouped average can be keyed on.

use polars::prelude::DataType;
use serde::Serialize;
use std::fmt;

/// A grouping column of the Measurement Table.
///
/// `Month`, `Year` and `Station` are categorical. `Rain` is numeric: every observed
/// rainfall amount forms its own group, amounts are never binned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GroupKey {
    #[serde(rename = "month")]
    Month,
    #[serde(rename = "year")]
    Year,
    #[serde(rename = "station")]
    Station,
    #[serde(rename = "RAIN")]
    Rain,
}

impl GroupKey {
    pub fn column_name(&self) -> &'static str {
        match self {
            GroupKey::Month => "month",
            GroupKey::Year => "year",
            GroupKey::Station => "station",
            GroupKey::Rain => "RAIN",
        }
    }

    /// The type the loader normalises this column to.
    pub(crate) fn dtype(&self) -> DataType {
        match self {
            GroupKey::Month | GroupKey::Year => DataType::Int64,
            GroupKey::Station => DataType::String,
            GroupKey::Rain => DataType::Float64,
        }
    }
}

/// Formats a `GroupKey` as its CSV header name.
///
/// # Examples
///
/// ```
/// use air_quality::GroupKey;
///
/// assert_eq!(GroupKey::Month.to_string(), "month");
/// assert_eq!(GroupKey::Rain.to_string(), "RAIN");
/// ```
impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}
