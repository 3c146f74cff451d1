use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use sgp4::{Constants, Elements};

use crate::predict::error::PredictError;
use crate::predict::OrbitNumbering;

/// A satellite's element set together with its orbit-number correction.
pub struct SatelliteRecord {
    pub name: String,
    pub line1: String,
    pub line2: String,
    pub epoch: DateTime<Utc>,
    pub norad_id: u64,
    pub orbit_offset: i64,
    pub elements: Elements,
    pub constants: Constants,
}

impl SatelliteRecord {
    pub fn from_tle(
        name: &str,
        line1: &str,
        line2: &str,
        orbit_offset: i64,
    ) -> Result<Self, PredictError> {
        let name = name.trim().to_string();
        let line1 = line1.trim().to_string();
        let line2 = line2.trim().to_string();

        let epoch = parse_tle_epoch(&name, &line1)?;

        let elements = Elements::from_tle(Some(name.clone()), line1.as_bytes(), line2.as_bytes())
            .map_err(|e| PredictError::InvalidTle {
                name: name.clone(),
                message: e.to_string(),
            })?;

        let constants =
            Constants::from_elements(&elements).map_err(|e| PredictError::InvalidTle {
                name: name.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            norad_id: elements.norad_id,
            name,
            line1,
            line2,
            epoch,
            orbit_offset,
            elements,
            constants,
        })
    }

    /// Orbit number at `at` in the operator's numbering.
    pub fn orbit_number<N: OrbitNumbering + ?Sized>(
        &self,
        numbering: &N,
        at: DateTime<Utc>,
    ) -> Result<i64, PredictError> {
        Ok(numbering.orbit_number_at(self, at)? + self.orbit_offset)
    }
}

impl fmt::Debug for SatelliteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SatelliteRecord")
            .field("name", &self.name)
            .field("norad_id", &self.norad_id)
            .field("epoch", &self.epoch)
            .field("orbit_offset", &self.orbit_offset)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for SatelliteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[TLE] name={}, epoch={}, orbitOffset={}",
            self.name,
            self.epoch.format("%Y/%m/%d %H:%M:%S"),
            self.orbit_offset
        )
    }
}

/// Epoch from line 1 columns 19-32: two-digit year then fractional day of year.
pub fn parse_tle_epoch(name: &str, line1: &str) -> Result<DateTime<Utc>, PredictError> {
    let field = line1.get(18..32).unwrap_or_default();
    let invalid = || PredictError::InvalidEpoch {
        name: name.to_string(),
        field: field.to_string(),
    };

    let yy: i32 = field.get(0..2).ok_or_else(invalid)?.trim().parse().map_err(|_| invalid())?;
    let day: f64 = field.get(2..).ok_or_else(invalid)?.trim().parse().map_err(|_| invalid())?;
    if !(1.0..367.0).contains(&day) {
        return Err(invalid());
    }

    // NORAD convention: 57-99 are 1900s
    let year = if yy < 57 { 2000 + yy } else { 1900 + yy };
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(invalid)?
        .and_utc();

    let micros = ((day - 1.0) * 86_400e6).round() as i64;
    Ok(jan1 + Duration::microseconds(micros))
}
