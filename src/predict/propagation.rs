use chrono::{DateTime, Utc};

use crate::predict::error::PredictError;
use crate::predict::ground_station::{ecef_to_geodetic, GroundStation};
use crate::predict::satellite::SatelliteRecord;
use crate::predict::sun::{in_earth_shadow, sun_direction};
use crate::predict::types::OrbitalState;

/// Propagate `satellite` to `timestamp` and look at it from `station`.
pub fn propagate_state(
    satellite: &SatelliteRecord,
    station: &GroundStation,
    timestamp: DateTime<Utc>,
) -> Result<OrbitalState, PredictError> {
    let minutes = satellite
        .elements
        .datetime_to_minutes_since_epoch(&timestamp.naive_utc())
        .map_err(|e| PredictError::Propagation(e.to_string()))?;

    let prediction = satellite
        .constants
        .propagate(minutes)
        .map_err(|e| PredictError::Propagation(format!("{}: {}", satellite.name, e)))?;

    let sidereal =
        sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&timestamp.naive_utc()));

    let sat_ecef = teme_to_ecef_position(prediction.position, sidereal);
    let sta_ecef = station.position_ecef_km();

    let dr = [
        sat_ecef[0] - sta_ecef[0],
        sat_ecef[1] - sta_ecef[1],
        sat_ecef[2] - sta_ecef[2],
    ];
    let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();

    let enu = ecef_to_enu(dr, station.lat_rad(), station.lon_rad());
    let azimuth = enu.0.atan2(enu.1).to_degrees().rem_euclid(360.0);
    let elevation = if range_km > 0.0 {
        (enu.2 / range_km).asin().to_degrees()
    } else {
        90.0
    };

    let (sub_lat, sub_lon, altitude_km) = ecef_to_geodetic(sat_ecef);
    let eclipsed = in_earth_shadow(prediction.position, sun_direction(timestamp));

    Ok(OrbitalState {
        timestamp,
        sub_latitude_deg: sub_lat,
        sub_longitude_deg: sub_lon,
        altitude_km,
        azimuth_deg: azimuth,
        elevation_deg: elevation,
        range_km,
        eclipsed,
    })
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}
