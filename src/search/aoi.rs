use std::collections::HashSet;
use std::fmt;

use crate::predict::GroundStation;
use crate::report::sexagesimal;
use crate::search::error::SearchError;

/// A fixed ground point, seen with a zero-degree horizon from sea level.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaOfInterest {
    pub name: String,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

impl AreaOfInterest {
    pub fn new(name: &str, latitude_deg: f64, longitude_deg: f64) -> Result<Self, SearchError> {
        let invalid = |reason: &str| SearchError::InvalidAoi {
            entry: name.to_string(),
            reason: reason.to_string(),
        };

        if name.trim().is_empty() {
            return Err(invalid("empty name"));
        }
        if !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(invalid("latitude outside [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&longitude_deg) {
            return Err(invalid("longitude outside [-180, 180]"));
        }

        Ok(Self {
            name: name.trim().to_string(),
            latitude_deg,
            longitude_deg,
        })
    }

    /// Parse a `lat, lon, name` line.
    pub fn from_line(line: &str) -> Result<Self, SearchError> {
        let invalid = |reason: &str| SearchError::InvalidAoi {
            entry: line.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<_> = line.split(',').map(|s| s.trim()).collect();
        if parts.len() < 3 {
            return Err(invalid("expected lat, lon, name"));
        }
        let lat: f64 = parts[0].parse().map_err(|_| invalid("latitude is not a number"))?;
        let lon: f64 = parts[1].parse().map_err(|_| invalid("longitude is not a number"))?;

        Self::new(parts[2], lat, lon).map_err(|e| match e {
            SearchError::InvalidAoi { reason, .. } => invalid(&reason),
            other => other,
        })
    }

    pub fn observer(&self) -> GroundStation {
        GroundStation::new(self.latitude_deg, self.longitude_deg)
    }
}

impl fmt::Display for AreaOfInterest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[AOI] name={}, lat={:.6} ({}), lon={:.6} ({})",
            self.name,
            self.latitude_deg,
            sexagesimal(self.latitude_deg),
            self.longitude_deg,
            sexagesimal(self.longitude_deg)
        )
    }
}

/// Parse a whole AOI list, rejecting it if any line is invalid.
///
/// Every bad line is logged before the list is rejected so a single run
/// reports all of them.
pub fn parse_aoi_list(content: &str) -> Result<Vec<AreaOfInterest>, SearchError> {
    let mut aois = Vec::new();
    let mut failures = Vec::new();
    let mut names = HashSet::new();

    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match AreaOfInterest::from_line(line) {
            Ok(aoi) => {
                if names.insert(aoi.name.clone()) {
                    aois.push(aoi);
                } else {
                    log::error!("Duplicate AOI name: {}", line);
                    failures.push(SearchError::DuplicateAoi(aoi.name));
                }
            }
            Err(e) => {
                log::error!("Invalid lat,lon: {}", line);
                failures.push(e);
            }
        }
    }

    if let Some(first) = failures.first() {
        return Err(SearchError::InvalidAoiList {
            count: failures.len(),
            first: first.to_string(),
        });
    }

    Ok(aois)
}
