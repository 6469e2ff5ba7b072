use crate::aggregation::error::AggregationError;
use crate::presenter::PresentError;
use crate::table::error::LoadError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AirQualityError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error(transparent)]
    Present(#[from] PresentError),
}
