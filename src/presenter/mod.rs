//! The seam between computed views and whatever displays them.
//!
//! ```text
//!  MeasurementTable ──► Dashboard::build ──► [View; 5] ──► Presenter::present (× 5)
//!                                                          Presenter::finish
//! ```
//!
//! Chart rendering lives outside this crate. The presenters here produce text, JSON
//! or data files; a plotting library can be plugged in by implementing [`Presenter`].

pub mod export;
pub mod json;
pub mod table;

use crate::dashboard::View;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PresentError {
    #[error("Failed writing view '{slug}'")]
    Io {
        slug: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create output directory '{0}'")]
    OutputDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed converting view '{slug}' to a DataFrame")]
    Frame {
        slug: String,
        #[source]
        source: PolarsError,
    },

    #[error("Encoding error writing '{0}'")]
    Encode(PathBuf, #[source] PolarsError),

    #[error("Failed to serialise dashboard to JSON")]
    Json(#[from] serde_json::Error),
}

/// Receives the views of a dashboard pass, one at a time and in order.
pub trait Presenter {
    fn present(&mut self, view: &View) -> Result<(), PresentError>;

    /// Called once after the last view. Presenters that buffer output flush it here.
    fn finish(&mut self) -> Result<(), PresentError> {
        Ok(())
    }
}
