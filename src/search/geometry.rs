use crate::predict::OrbitalState;
use crate::search::error::SearchError;

/// Mean Earth radius for the spherical viewing-geometry model.
pub const EARTH_RADIUS_KM: f64 = 6378.1;

/// Largest excess over 1 in the arcsin argument still treated as rounding.
const ASIN_SLACK: f64 = 1e-12;

/// Angle at the satellite between nadir and the line of sight to the observer.
///
/// Law of sines on the Earth-centre / satellite / observer triangle:
/// `asin(R / (R + h) * cos(elevation))`.
pub fn off_nadir_deg(elevation_deg: f64, altitude_km: f64) -> Result<f64, SearchError> {
    let domain_error = || SearchError::GeometryDomain {
        elevation_deg,
        altitude_km,
    };

    if !altitude_km.is_finite() || altitude_km <= 0.0 {
        return Err(domain_error());
    }
    if !(0.0..=90.0).contains(&elevation_deg) {
        return Err(domain_error());
    }

    let ratio = EARTH_RADIUS_KM / (EARTH_RADIUS_KM + altitude_km) * elevation_deg.to_radians().cos();
    if ratio.abs() > 1.0 + ASIN_SLACK {
        return Err(domain_error());
    }

    Ok(ratio.clamp(-1.0, 1.0).asin().to_degrees())
}

/// Viewing-geometry filter. Strict: an angle equal to the limit fails.
pub fn within_off_nadir(off_nadir_deg: f64, max_off_nadir_deg: f64) -> bool {
    off_nadir_deg < max_off_nadir_deg
}

/// Illumination filter.
pub fn is_sunlit(state: &OrbitalState) -> bool {
    !state.eclipsed
}
