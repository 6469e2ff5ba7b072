use crate::dashboard::View;
use crate::presenter::{PresentError, Presenter};
use log::info;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// File format of exported view data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Parquet,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Parquet => "parquet",
        }
    }
}

/// Writes each view's data frame to `<output_dir>/<slug>.<ext>`, creating the directory
/// if needed. Existing files are overwritten.
pub struct ExportPresenter {
    output_dir: PathBuf,
    format: ExportFormat,
    written: Vec<PathBuf>,
}

impl ExportPresenter {
    pub fn new(output_dir: &Path, format: ExportFormat) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            format,
            written: Vec::new(),
        }
    }

    /// Files written so far, in view order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write_frame(&self, mut frame: DataFrame, path: &Path) -> Result<(), PresentError> {
        let file = File::create(path).map_err(|e| PresentError::Io {
            slug: path.display().to_string(),
            source: e,
        })?;
        match self.format {
            ExportFormat::Csv => CsvWriter::new(file)
                .include_header(true)
                .finish(&mut frame)
                .map_err(|e| PresentError::Encode(path.to_path_buf(), e)),
            ExportFormat::Parquet => ParquetWriter::new(file)
                .with_compression(ParquetCompression::Snappy)
                .finish(&mut frame)
                .map(|_| ())
                .map_err(|e| PresentError::Encode(path.to_path_buf(), e)),
        }
    }
}

impl Presenter for ExportPresenter {
    fn present(&mut self, view: &View) -> Result<(), PresentError> {
        fs::create_dir_all(&self.output_dir)
            .map_err(|e| PresentError::OutputDirCreation(self.output_dir.clone(), e))?;

        let frame = view.data.to_frame().map_err(|e| PresentError::Frame {
            slug: view.slug.to_string(),
            source: e,
        })?;
        let path = self
            .output_dir
            .join(format!("{}.{}", view.slug, self.format.extension()));

        self.write_frame(frame, &path)?;
        info!("Exported view '{}' to {:?}", view.slug, path);
        self.written.push(path);
        Ok(())
    }
}
