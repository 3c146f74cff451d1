use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::predict::PredictError;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid AOI {entry:?}: {reason}")]
    InvalidAoi { entry: String, reason: String },
    #[error("{count} invalid AOI entries, first: {first}")]
    InvalidAoiList { count: usize, first: String },
    #[error("Duplicate AOI name: {0}")]
    DuplicateAoi(String),
    #[error("Off-nadir undefined for elevation {elevation_deg} deg at altitude {altitude_km} km")]
    GeometryDomain { elevation_deg: f64, altitude_km: f64 },
    #[error("{satellite} over {aoi}: search clock stuck at {cursor} (next event {next})")]
    NoProgress {
        satellite: String,
        aoi: String,
        cursor: DateTime<Utc>,
        next: DateTime<Utc>,
    },
    #[error("{satellite} over {aoi}: window not exhausted after {limit} iterations")]
    IterationLimit {
        satellite: String,
        aoi: String,
        limit: usize,
    },
    #[error("Invalid search window: {0}")]
    InvalidWindow(String),
    #[error("Predict error: {0}")]
    Predict(#[from] PredictError),
}
