use crate::dashboard::View;
use crate::presenter::{PresentError, Presenter};
use std::io::Write;

/// Writes each view as a heading followed by its data as a formatted table.
///
/// Table width and row limits follow Polars' `POLARS_FMT_*` environment variables.
pub struct TablePresenter<W: Write> {
    writer: W,
}

impl<W: Write> TablePresenter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Presenter for TablePresenter<W> {
    fn present(&mut self, view: &View) -> Result<(), PresentError> {
        let frame = view.data.to_frame().map_err(|e| PresentError::Frame {
            slug: view.slug.to_string(),
            source: e,
        })?;
        let io_error = |e: std::io::Error| PresentError::Io {
            slug: view.slug.to_string(),
            source: e,
        };
        writeln!(self.writer, "## {}", view.chart.title).map_err(io_error)?;
        writeln!(self.writer, "{}", frame).map_err(io_error)?;
        writeln!(self.writer).map_err(io_error)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), PresentError> {
        self.writer.flush().map_err(|e| PresentError::Io {
            slug: "<flush>".to_string(),
            source: e,
        })
    }
}
