use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("Required column '{0}' not found in measurement table")]
    MissingColumn(String),

    #[error("Column '{0}' is the group key and cannot also be averaged")]
    KeyInValues(String),

    #[error("Group key column '{column}' has unsupported type {dtype}")]
    UnsupportedKeyType { column: String, dtype: String },

    #[error("Failed processing DataFrame: {0}")]
    Polars(#[from] PolarsError),
}
