use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::predict::{OrbitalState, SatelliteRecord};
use crate::search::aoi::AreaOfInterest;

/// An accepted observation opportunity, stamped at its transit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pass {
    pub satellite: String,
    pub aoi: String,
    pub orbit: i64,
    pub transit: DateTime<Utc>,
    pub sub_latitude_deg: f64,
    pub sub_longitude_deg: f64,
    pub altitude_km: f64,
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub range_km: f64,
    pub off_nadir_deg: f64,
}

impl Pass {
    pub fn new(
        satellite: &SatelliteRecord,
        aoi: &AreaOfInterest,
        orbit: i64,
        state: &OrbitalState,
        off_nadir_deg: f64,
    ) -> Self {
        Self {
            satellite: satellite.name.clone(),
            aoi: aoi.name.clone(),
            orbit,
            transit: state.timestamp,
            sub_latitude_deg: state.sub_latitude_deg,
            sub_longitude_deg: state.sub_longitude_deg,
            altitude_km: state.altitude_km,
            azimuth_deg: state.azimuth_deg,
            elevation_deg: state.elevation_deg,
            range_km: state.range_km,
            off_nadir_deg,
        }
    }

    /// Transit calendar date, `YYYY-MM-DD`.
    pub fn date_str(&self) -> String {
        self.transit.format("%Y-%m-%d").to_string()
    }

    /// Transit time of day to a tenth of a second, `HH:MM:SS.s`.
    pub fn time_str(&self) -> String {
        let tenths = (self.transit.timestamp_subsec_millis() / 100).min(9);
        format!("{}.{}", self.transit.format("%H:%M:%S"), tenths)
    }
}
