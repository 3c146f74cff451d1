mod error;
mod ground_station;
mod orbit_number;
mod pass_finder;
mod propagation;
mod satellite;
mod sun;
mod tle_loader;
mod tle_source;
mod types;

use chrono::{DateTime, Duration, Utc};

pub use error::PredictError;
pub use ground_station::GroundStation;
pub use orbit_number::raw_orbit_number;
pub use pass_finder::find_next_pass;
pub use propagation::propagate_state;
pub use satellite::SatelliteRecord;
pub use tle_loader::TleLoader;
pub use tle_source::{refresh_tle_cache, DEFAULT_TLE_URL};
pub use types::{OrbitalState, PassEvents};

#[cfg(test)]
pub(crate) use satellite::tests as satellite_fixtures;

/// How far ahead the SGP4 finder looks for a rise before giving up.
pub const DEFAULT_LOOKAHEAD_DAYS: i64 = 7;

/// Satellite position, look angles and illumination at an instant.
pub trait OrbitalStateProvider {
    fn state_at(
        &self,
        satellite: &SatelliteRecord,
        observer: &GroundStation,
        at: DateTime<Utc>,
    ) -> Result<OrbitalState, PredictError>;
}

/// Next rise, transit and set after a reference time.
///
/// Implementations must return a transit strictly after `after`.
pub trait PassEventFinder {
    fn next_pass(
        &self,
        satellite: &SatelliteRecord,
        observer: &GroundStation,
        after: DateTime<Utc>,
    ) -> Result<PassEvents, PredictError>;
}

/// Raw revolution count, non-decreasing in time for a fixed element set.
pub trait OrbitNumbering {
    fn orbit_number_at(
        &self,
        satellite: &SatelliteRecord,
        at: DateTime<Utc>,
    ) -> Result<i64, PredictError>;
}

/// SGP4-backed implementation of all three collaborators.
#[derive(Debug, Clone, Copy)]
pub struct Sgp4Predictor {
    lookahead: Duration,
}

impl Default for Sgp4Predictor {
    fn default() -> Self {
        Self {
            lookahead: Duration::days(DEFAULT_LOOKAHEAD_DAYS),
        }
    }
}

impl OrbitalStateProvider for Sgp4Predictor {
    fn state_at(
        &self,
        satellite: &SatelliteRecord,
        observer: &GroundStation,
        at: DateTime<Utc>,
    ) -> Result<OrbitalState, PredictError> {
        propagate_state(satellite, observer, at)
    }
}

impl PassEventFinder for Sgp4Predictor {
    fn next_pass(
        &self,
        satellite: &SatelliteRecord,
        observer: &GroundStation,
        after: DateTime<Utc>,
    ) -> Result<PassEvents, PredictError> {
        find_next_pass(observer, satellite, after, self.lookahead)
    }
}

impl OrbitNumbering for Sgp4Predictor {
    fn orbit_number_at(
        &self,
        satellite: &SatelliteRecord,
        at: DateTime<Utc>,
    ) -> Result<i64, PredictError> {
        Ok(raw_orbit_number(satellite, at))
    }
}
