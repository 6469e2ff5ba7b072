mod aggregation;
mod dashboard;
mod error;
mod presenter;
mod table;
mod types;

pub use error::AirQualityError;

pub use aggregation::correlation::{correlation_matrix, CorrelationMatrix};
pub use aggregation::error::AggregationError;
pub use aggregation::grouped_means::{average_by, GroupedMeans};

pub use table::error::LoadError;
pub use table::measurement_table::{MeasurementTable, DEFAULT_DATA_PATH, DEFAULT_NULL_VALUES};

pub use dashboard::{
    render_dashboard, Dashboard, View, ViewData, ViewDefinition, ViewQuery, STANDARD_VIEWS,
};

pub use presenter::export::{ExportFormat, ExportPresenter};
pub use presenter::json::JsonPresenter;
pub use presenter::table::TablePresenter;
pub use presenter::{PresentError, Presenter};

pub use types::chart::{ChartKind, ChartSpec};
pub use types::group_key::GroupKey;
pub use types::group_value::GroupValue;
pub use types::measurement::Measurement;
