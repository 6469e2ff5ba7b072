use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    // Checked before the CSV reader is opened; nothing is aggregated after this.
    #[error("Source file '{0}' not found")]
    SourceFileMissing(PathBuf),

    #[error("Failed to read metadata for source file '{0}'")]
    SourceMetadata(PathBuf, #[source] std::io::Error),

    #[error("Parsing error reading CSV data from '{0}'")]
    CsvRead(PathBuf, #[source] PolarsError),

    #[error("Measurement table from {0} contains no rows")]
    EmptyTable(String),

    #[error("Failed to normalise measurement columns of {source_name}")]
    Normalize {
        source_name: String,
        #[source]
        source: PolarsError,
    },
}
