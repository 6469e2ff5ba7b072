//! Chart metadata attached to each dashboard view.
//!
//! Nothing here draws anything. These values describe how a presenter is expected to
//! show a view; rendering belongs to whichever plotting library the presenter wraps.

use serde::Serialize;

/// The kind of chart a view is meant to be drawn as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Grouped bars, one bar per measurement for each key value.
    Bar,
    /// One line per measurement over the ordered key values.
    Line,
    /// An annotated square matrix.
    Heatmap,
}

/// Title, axis labels and chart kind of a dashboard view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartSpec {
    pub title: &'static str,
    pub kind: ChartKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_label: Option<&'static str>,
}
