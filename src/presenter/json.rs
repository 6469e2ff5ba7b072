use crate::dashboard::{View, ViewData};
use crate::presenter::{PresentError, Presenter};
use crate::types::chart::ChartSpec;
use crate::types::group_key::GroupKey;
use crate::types::group_value::GroupValue;
use crate::types::measurement::Measurement;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Write;

#[derive(Serialize)]
struct GroupRecord<'a> {
    key: &'a GroupValue,
    means: &'a BTreeMap<Measurement, Option<f64>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum DataRecord<'a> {
    Grouped {
        key: GroupKey,
        columns: &'a [Measurement],
        groups: Vec<GroupRecord<'a>>,
    },
    Correlation {
        columns: &'a [Measurement],
        values: &'a [Vec<f64>],
    },
}

#[derive(Serialize)]
struct ViewRecord<'a> {
    slug: &'a str,
    chart: &'a ChartSpec,
    data: DataRecord<'a>,
}

impl<'a> From<&'a View> for ViewRecord<'a> {
    fn from(view: &'a View) -> Self {
        let data = match &view.data {
            ViewData::GroupedMeans(means) => DataRecord::Grouped {
                key: means.key(),
                columns: means.columns(),
                groups: means
                    .groups()
                    .iter()
                    .map(|(key, means)| GroupRecord { key, means })
                    .collect(),
            },
            ViewData::Correlation(matrix) => DataRecord::Correlation {
                columns: matrix.columns(),
                values: matrix.values(),
            },
        };
        ViewRecord {
            slug: view.slug,
            chart: &view.chart,
            data,
        }
    }
}

/// Collects every view and writes the dashboard as one JSON document on
/// [`Presenter::finish`]:
///
/// ```json
/// { "views": [ { "slug": "...", "chart": { ... }, "data": { ... } }, ... ] }
/// ```
///
/// Grouped views carry `key`, `columns` and `groups: [{ "key": 1, "means": { "PM2.5": 15.0 } }]`;
/// the correlation view carries `columns` and a row-major `values` matrix. Missing means and
/// undefined coefficients are written as `null`.
pub struct JsonPresenter<W: Write> {
    writer: W,
    pretty: bool,
    views: Vec<Value>,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: false,
            views: Vec::new(),
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn present(&mut self, view: &View) -> Result<(), PresentError> {
        self.views.push(serde_json::to_value(ViewRecord::from(view))?);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), PresentError> {
        let mut document = serde_json::Map::new();
        document.insert("views".to_string(), Value::Array(std::mem::take(&mut self.views)));
        let document = Value::Object(document);

        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &document)?;
        } else {
            serde_json::to_writer(&mut self.writer, &document)?;
        }
        writeln!(self.writer).map_err(|e| PresentError::Io {
            slug: "<document>".to_string(),
            source: e,
        })
    }
}
