use chrono::{DateTime, Utc};

use crate::predict::ground_station::WGS84_A_KM;

const J2000_JD: f64 = 2_451_545.0;
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

pub fn julian_date(at: DateTime<Utc>) -> f64 {
    let seconds = at.timestamp() as f64 + f64::from(at.timestamp_subsec_nanos()) * 1e-9;
    UNIX_EPOCH_JD + seconds / 86_400.0
}

/// Unit vector towards the Sun in the equatorial frame of date.
///
/// Low precision almanac series, good to about 0.01 degrees, which is far
/// below what the cylindrical shadow test can resolve.
pub fn sun_direction(at: DateTime<Utc>) -> [f64; 3] {
    let n = julian_date(at) - J2000_JD;
    let mean_longitude = (280.460 + 0.985_647_4 * n).rem_euclid(360.0);
    let mean_anomaly = (357.528 + 0.985_600_3 * n).rem_euclid(360.0).to_radians();
    let ecliptic_longitude = (mean_longitude
        + 1.915 * mean_anomaly.sin()
        + 0.020 * (2.0 * mean_anomaly).sin())
    .to_radians();
    let obliquity = (23.439 - 0.000_000_4 * n).to_radians();

    [
        ecliptic_longitude.cos(),
        obliquity.cos() * ecliptic_longitude.sin(),
        obliquity.sin() * ecliptic_longitude.sin(),
    ]
}

/// Cylindrical Earth shadow test for a geocentric inertial position.
pub fn in_earth_shadow(sat_km: [f64; 3], sun_dir: [f64; 3]) -> bool {
    let proj = sat_km[0] * sun_dir[0] + sat_km[1] * sun_dir[1] + sat_km[2] * sun_dir[2];
    if proj > 0.0 {
        // sunward side
        return false;
    }

    let perp = [
        sat_km[0] - proj * sun_dir[0],
        sat_km[1] - proj * sun_dir[1],
        sat_km[2] - proj * sun_dir[2],
    ];
    let perp_dist = (perp[0] * perp[0] + perp[1] * perp[1] + perp[2] * perp[2]).sqrt();
    perp_dist < WGS84_A_KM
}
