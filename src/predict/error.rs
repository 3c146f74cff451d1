use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("TLE file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Invalid TLE format for {name}: {message}")]
    InvalidTle { name: String, message: String },
    #[error("Invalid TLE epoch for {name}: {field:?}")]
    InvalidEpoch { name: String, field: String },
    #[error("Propagation error: {0}")]
    Propagation(String),
    #[error("No pass of {satellite} found within {lookahead_hours} h after {after}")]
    NoPassFound {
        satellite: String,
        after: DateTime<Utc>,
        lookahead_hours: i64,
    },
    #[error("TLE download from {url} failed: {message}")]
    Download { url: String, message: String },
}
