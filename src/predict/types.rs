use chrono::{DateTime, Utc};
use serde::Serialize;

/// Satellite state seen from an observer at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitalState {
    pub timestamp: DateTime<Utc>,
    pub sub_latitude_deg: f64,
    pub sub_longitude_deg: f64,
    pub altitude_km: f64,
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub range_km: f64,
    pub eclipsed: bool,
}

/// Rise, maximum elevation and set of a single pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PassEvents {
    pub rise: DateTime<Utc>,
    pub transit: DateTime<Utc>,
    pub set: DateTime<Utc>,
}
