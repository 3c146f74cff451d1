use chrono::{DateTime, Duration, Utc};

use crate::predict::error::PredictError;
use crate::predict::propagation::propagate_state;
use crate::predict::types::PassEvents;
use crate::predict::{GroundStation, SatelliteRecord};

const COARSE_STEP_SECONDS: i64 = 60; // 1 minute for initial scan
const FINE_STEP_SECONDS: i64 = 1; // 1 second for refinement
const TRANSIT_TOLERANCE_MS: i64 = 100;
const RATE_PROBE_MS: i64 = 500;
const HORIZON_ELEVATION: f64 = 0.0;

/// Find the first pass whose maximum elevation lies strictly after `after`.
///
/// A pass already in progress at `after` is reported with `rise == after`
/// when its maximum is still ahead, and skipped otherwise.
pub fn find_next_pass(
    station: &GroundStation,
    satellite: &SatelliteRecord,
    after: DateTime<Utc>,
    lookahead: Duration,
) -> Result<PassEvents, PredictError> {
    let limit = after + lookahead;
    let no_pass = || PredictError::NoPassFound {
        satellite: satellite.name.clone(),
        after,
        lookahead_hours: lookahead.num_hours(),
    };

    let mut cursor = after;
    loop {
        let in_progress = is_above(station, satellite, cursor)?;
        let rise = if in_progress {
            cursor
        } else {
            scan_for_rise(station, satellite, cursor, limit)?.ok_or_else(no_pass)?
        };
        let set = scan_for_set(station, satellite, rise, limit)?.ok_or_else(no_pass)?;

        // Maximum already behind us, move on to the next pass
        if in_progress && !is_rising(station, satellite, rise)? {
            cursor = set + Duration::seconds(FINE_STEP_SECONDS);
            continue;
        }

        let transit = find_transit(station, satellite, rise, set)?;
        if transit > after {
            return Ok(PassEvents { rise, transit, set });
        }
        cursor = set + Duration::seconds(FINE_STEP_SECONDS);
    }
}

fn elevation_at(
    station: &GroundStation,
    satellite: &SatelliteRecord,
    at: DateTime<Utc>,
) -> Result<f64, PredictError> {
    Ok(propagate_state(satellite, station, at)?.elevation_deg)
}

fn is_above(
    station: &GroundStation,
    satellite: &SatelliteRecord,
    at: DateTime<Utc>,
) -> Result<bool, PredictError> {
    Ok(elevation_at(station, satellite, at)? > HORIZON_ELEVATION)
}

fn is_rising(
    station: &GroundStation,
    satellite: &SatelliteRecord,
    at: DateTime<Utc>,
) -> Result<bool, PredictError> {
    let probe = Duration::milliseconds(RATE_PROBE_MS);
    Ok(elevation_at(station, satellite, at + probe)? > elevation_at(station, satellite, at)?)
}

fn scan_for_rise(
    station: &GroundStation,
    satellite: &SatelliteRecord,
    from: DateTime<Utc>,
    limit: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, PredictError> {
    let coarse_step = Duration::seconds(COARSE_STEP_SECONDS);
    let mut cursor = from;

    while cursor <= limit {
        let next = cursor + coarse_step;
        if is_above(station, satellite, next)? {
            return refine_crossing(station, satellite, cursor, next, true).map(Some);
        }
        cursor = next;
    }

    Ok(None)
}

fn scan_for_set(
    station: &GroundStation,
    satellite: &SatelliteRecord,
    rise: DateTime<Utc>,
    limit: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, PredictError> {
    let coarse_step = Duration::seconds(COARSE_STEP_SECONDS);
    let mut cursor = rise;

    while cursor <= limit {
        let next = cursor + coarse_step;
        if !is_above(station, satellite, next)? {
            return refine_crossing(station, satellite, cursor, next, false).map(Some);
        }
        cursor = next;
    }

    Ok(None)
}

/// Binary search to find exact horizon crossing time.
///
/// Returns the first instant above the horizon for a rise and the first
/// instant below it for a set.
fn refine_crossing(
    station: &GroundStation,
    satellite: &SatelliteRecord,
    before: DateTime<Utc>,
    after: DateTime<Utc>,
    is_rise: bool,
) -> Result<DateTime<Utc>, PredictError> {
    let mut low = before;
    let mut high = after;

    while (high - low).num_seconds() > FINE_STEP_SECONDS {
        let mid = low + (high - low) / 2;
        let above = is_above(station, satellite, mid)?;
        if above == is_rise {
            high = mid;
        } else {
            low = mid;
        }
    }

    Ok(high)
}

/// Bisect on the sign of the elevation rate between rise and set.
fn find_transit(
    station: &GroundStation,
    satellite: &SatelliteRecord,
    rise: DateTime<Utc>,
    set: DateTime<Utc>,
) -> Result<DateTime<Utc>, PredictError> {
    let probe = Duration::milliseconds(RATE_PROBE_MS);
    let mut low = rise;
    let mut high = set;

    while (high - low).num_milliseconds() > TRANSIT_TOLERANCE_MS {
        let mid = low + (high - low) / 2;
        let rate = elevation_at(station, satellite, mid + probe)?
            - elevation_at(station, satellite, mid - probe)?;
        if rate > 0.0 {
            low = mid;
        } else {
            high = mid;
        }
    }

    Ok(low + (high - low) / 2)
}
