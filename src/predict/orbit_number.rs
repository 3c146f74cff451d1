use chrono::{DateTime, Utc};

use crate::predict::SatelliteRecord;

/// Revolutions completed at `at`, counted at ascending node crossings.
///
/// Starts from the element set's revolution number and adds the mean
/// argument of latitude already covered at epoch, so the count ticks over
/// at the node rather than at the epoch.
pub fn raw_orbit_number(satellite: &SatelliteRecord, at: DateTime<Utc>) -> i64 {
    let elements = &satellite.elements;
    let elapsed_days = (at - satellite.epoch).num_milliseconds() as f64 / 86_400_000.0;
    let phase = (elements.argument_of_perigee + elements.mean_anomaly).rem_euclid(360.0) / 360.0;

    elements.revolution_number as i64 + (phase + elements.mean_motion * elapsed_days).floor() as i64
}
