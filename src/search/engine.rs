use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::predict::{OrbitNumbering, OrbitalStateProvider, PassEventFinder, SatelliteRecord};
use crate::search::aoi::AreaOfInterest;
use crate::search::error::SearchError;
use crate::search::geometry::{is_sunlit, off_nadir_deg, within_off_nadir};
use crate::search::types::Pass;

pub const DEFAULT_MAX_ITERATIONS: usize = 100_000;

/// Gap between a pass's set and the next search, so it is not found twice.
const RESUME_AFTER_SET: Duration = Duration::seconds(1);

/// Transit instants outside `[start, end]` end the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SearchWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, SearchError> {
        if end < start {
            return Err(SearchError::InvalidWindow(format!(
                "end {} before start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// Midnight of `start_date` through 23:59:59 of the last of `days` days.
    pub fn from_days(start_date: NaiveDate, days: u32) -> Result<Self, SearchError> {
        if days == 0 {
            return Err(SearchError::InvalidWindow("zero days".into()));
        }
        let last_day = start_date
            .checked_add_days(chrono::Days::new(u64::from(days - 1)))
            .ok_or_else(|| SearchError::InvalidWindow(format!("{} days is out of range", days)))?;
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59)
            .ok_or_else(|| SearchError::InvalidWindow("no end-of-day time".into()))?;

        Self::new(
            start_date.and_time(NaiveTime::MIN).and_utc(),
            last_day.and_time(end_of_day).and_utc(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    pub max_off_nadir_deg: f64,
    pub max_iterations: usize,
}

impl SearchOptions {
    pub fn new(max_off_nadir_deg: f64) -> Self {
        Self {
            max_off_nadir_deg,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Enumerate the qualifying passes of one satellite over one AOI.
///
/// Passes come back in transit order. The search clock is a local cursor
/// that only moves forward; collaborators that fail to move it end the
/// search with an error instead of spinning.
pub fn search_passes<C>(
    aoi: &AreaOfInterest,
    satellite: &SatelliteRecord,
    window: &SearchWindow,
    options: &SearchOptions,
    collaborators: &C,
) -> Result<Vec<Pass>, SearchError>
where
    C: OrbitalStateProvider + PassEventFinder + OrbitNumbering,
{
    let observer = aoi.observer();
    let mut cursor = window.start;
    let mut passes = Vec::new();

    let no_progress = |cursor: DateTime<Utc>, next: DateTime<Utc>| SearchError::NoProgress {
        satellite: satellite.name.clone(),
        aoi: aoi.name.clone(),
        cursor,
        next,
    };

    for _ in 0..options.max_iterations {
        let events = collaborators.next_pass(satellite, &observer, cursor)?;
        if events.transit <= cursor {
            return Err(no_progress(cursor, events.transit));
        }
        if events.transit > window.end {
            log::debug!(
                "{} over {}: window exhausted with {} passes",
                satellite.name,
                aoi.name,
                passes.len()
            );
            return Ok(passes);
        }

        let state = collaborators.state_at(satellite, &observer, events.transit)?;
        let off_nadir = off_nadir_deg(state.elevation_deg, state.altitude_km)?;

        let geometry_ok = within_off_nadir(off_nadir, options.max_off_nadir_deg);
        let sunlit = is_sunlit(&state);

        if geometry_ok && sunlit {
            let orbit = satellite.orbit_number(collaborators, events.transit)?;
            passes.push(Pass::new(satellite, aoi, orbit, &state, off_nadir));
        } else {
            log::debug!(
                "{} over {} at {}: rejected (off-nadir {:.1} deg, eclipsed {})",
                satellite.name,
                aoi.name,
                events.transit,
                off_nadir,
                state.eclipsed
            );
        }

        let next = events.set + RESUME_AFTER_SET;
        if next <= cursor {
            return Err(no_progress(cursor, next));
        }
        cursor = next;
    }

    Err(SearchError::IterationLimit {
        satellite: satellite.name.clone(),
        aoi: aoi.name.clone(),
        limit: options.max_iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::satellite_fixtures::iss;
    use crate::predict::{GroundStation, OrbitalState, PassEvents, PredictError};
    use crate::search::geometry::EARTH_RADIUS_KM;
    use chrono::TimeZone;
    use std::cell::Cell;

    const ALTITUDE_KM: f64 = 700.0;

    /// Elevation giving an exact off-nadir angle at `ALTITUDE_KM`.
    fn elevation_for(off_nadir_deg: f64) -> f64 {
        let ratio = (EARTH_RADIUS_KM + ALTITUDE_KM) / EARTH_RADIUS_KM;
        (off_nadir_deg.to_radians().sin() * ratio).acos().to_degrees()
    }

    struct ScriptedTransit {
        transit: DateTime<Utc>,
        elevation_deg: f64,
        eclipsed: bool,
    }

    /// Transits at fixed instants, one revolution apart, 5 minutes either side.
    struct ScriptedOrbit {
        transits: Vec<ScriptedTransit>,
        epoch: DateTime<Utc>,
        period: Duration,
        first_orbit: i64,
    }

    impl ScriptedOrbit {
        fn circular(epoch: DateTime<Utc>, period: Duration, profile: &[(f64, bool)]) -> Self {
            let transits = profile
                .iter()
                .enumerate()
                .map(|(i, &(elevation_deg, eclipsed))| ScriptedTransit {
                    transit: epoch + period * (i as i32) + period / 4,
                    elevation_deg,
                    eclipsed,
                })
                .collect();
            Self {
                transits,
                epoch,
                period,
                first_orbit: 1000,
            }
        }

        fn find(&self, at: DateTime<Utc>) -> Option<&ScriptedTransit> {
            self.transits.iter().find(|t| t.transit == at)
        }
    }

    impl PassEventFinder for ScriptedOrbit {
        fn next_pass(
            &self,
            _satellite: &SatelliteRecord,
            _observer: &GroundStation,
            after: DateTime<Utc>,
        ) -> Result<PassEvents, PredictError> {
            let half = Duration::minutes(5);
            let transit = self
                .transits
                .iter()
                .map(|t| t.transit)
                .find(|t| *t > after)
                // Past the script the next transit is beyond any test window
                .unwrap_or_else(|| after + Duration::days(2));
            Ok(PassEvents {
                rise: transit - half,
                transit,
                set: transit + half,
            })
        }
    }

    impl OrbitalStateProvider for ScriptedOrbit {
        fn state_at(
            &self,
            _satellite: &SatelliteRecord,
            _observer: &GroundStation,
            at: DateTime<Utc>,
        ) -> Result<OrbitalState, PredictError> {
            let scripted = self
                .find(at)
                .ok_or_else(|| PredictError::Propagation(format!("no state at {}", at)))?;
            Ok(OrbitalState {
                timestamp: at,
                sub_latitude_deg: 0.0,
                sub_longitude_deg: 0.0,
                altitude_km: ALTITUDE_KM,
                azimuth_deg: 90.0,
                elevation_deg: scripted.elevation_deg,
                range_km: 1000.0,
                eclipsed: scripted.eclipsed,
            })
        }
    }

    impl OrbitNumbering for ScriptedOrbit {
        fn orbit_number_at(
            &self,
            _satellite: &SatelliteRecord,
            at: DateTime<Utc>,
        ) -> Result<i64, PredictError> {
            let elapsed = (at - self.epoch).num_milliseconds();
            Ok(self.first_orbit + elapsed / self.period.num_milliseconds())
        }
    }

    fn day_window() -> SearchWindow {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        SearchWindow::from_days(start.date_naive(), 1).unwrap()
    }

    fn equator() -> AreaOfInterest {
        AreaOfInterest::new("EQ", 0.0, 0.0).unwrap()
    }

    #[test]
    fn window_spans_whole_days() {
        let window =
            SearchWindow::from_days(NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(), 2).unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 2, 28, 0, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap());
        assert!(SearchWindow::from_days(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 0).is_err());
    }

    #[test]
    fn accepts_exactly_the_qualifying_transits() {
        let window = day_window();
        let period = Duration::minutes(100);
        // 14 transits fit in the day; off-nadir angles and eclipse flags by revolution
        let profile: Vec<(f64, bool)> = [
            (30.0, false),
            (44.0, false),
            (50.0, false),
            (20.0, true),
            (10.0, false),
            (45.5, false),
            (44.9, false),
            (60.0, true),
            (5.0, false),
            (12.0, false),
            (62.0, false),
            (40.0, false),
            (35.0, true),
            (1.0, false),
        ]
        .iter()
        .map(|&(off_nadir, eclipsed)| (elevation_for(off_nadir), eclipsed))
        .collect();
        let orbit = ScriptedOrbit::circular(window.start, period, &profile);
        let sat = iss(3);

        let passes = search_passes(
            &equator(),
            &sat,
            &window,
            &SearchOptions::new(45.0),
            &orbit,
        )
        .unwrap();

        let revolutions: Vec<i64> = passes.iter().map(|p| p.orbit - 1003).collect();
        assert_eq!(revolutions, vec![0, 1, 4, 6, 8, 9, 11, 13]);

        for pass in &passes {
            assert!(pass.off_nadir_deg >= 0.0 && pass.off_nadir_deg < 45.0);
            assert_eq!(pass.satellite, "ISS (ZARYA)");
            assert_eq!(pass.aoi, "EQ");
        }
        for pair in passes.windows(2) {
            assert!(pair[0].transit < pair[1].transit);
        }
        // Consecutive accepted revolutions differ by exactly one orbit
        assert_eq!(passes[1].orbit - passes[0].orbit, 1);
        assert_eq!(passes[5].orbit - passes[4].orbit, 1);
    }

    #[test]
    fn off_nadir_equal_to_limit_is_rejected() {
        let window = day_window();
        let elevation = 40.0;
        let limit = off_nadir_deg(elevation, ALTITUDE_KM).unwrap();
        let orbit =
            ScriptedOrbit::circular(window.start, Duration::minutes(100), &[(elevation, false)]);

        let strict = SearchOptions::new(limit);
        let passes = search_passes(&equator(), &iss(0), &window, &strict, &orbit).unwrap();
        assert!(passes.is_empty());

        let loose = SearchOptions::new(limit + 1e-9);
        let passes = search_passes(&equator(), &iss(0), &window, &loose, &orbit).unwrap();
        assert_eq!(passes.len(), 1);
    }

    #[test]
    fn transit_inside_window_with_set_outside_is_kept() {
        let window = day_window();
        let mut orbit = ScriptedOrbit::circular(window.start, Duration::minutes(100), &[]);
        orbit.transits.push(ScriptedTransit {
            transit: window.end - Duration::seconds(30),
            elevation_deg: 80.0,
            eclipsed: false,
        });

        let passes =
            search_passes(&equator(), &iss(0), &window, &SearchOptions::new(45.0), &orbit).unwrap();
        assert_eq!(passes.len(), 1);
        assert_eq!(passes[0].transit, window.end - Duration::seconds(30));
    }

    #[test]
    fn orbit_number_includes_offset() {
        let window = day_window();
        let orbit =
            ScriptedOrbit::circular(window.start, Duration::minutes(100), &[(80.0, false)]);

        for offset in [-5, 0, 42] {
            let passes = search_passes(
                &equator(),
                &iss(offset),
                &window,
                &SearchOptions::new(45.0),
                &orbit,
            )
            .unwrap();
            let raw = orbit.orbit_number_at(&iss(0), passes[0].transit).unwrap();
            assert_eq!(passes[0].orbit, raw + offset);
        }
    }

    #[test]
    fn search_is_repeatable() {
        let window = day_window();
        let profile = [(80.0, false), (20.0, false), (60.0, true), (75.0, false)];
        let orbit = ScriptedOrbit::circular(window.start, Duration::minutes(100), &profile);
        let options = SearchOptions::new(45.0);

        let first = search_passes(&equator(), &iss(1), &window, &options, &orbit).unwrap();
        let second = search_passes(&equator(), &iss(1), &window, &options, &orbit).unwrap();
        assert_eq!(first, second);
    }

    /// Always reports the same transit, whatever the reference time.
    struct StuckFinder {
        transit: DateTime<Utc>,
    }

    impl PassEventFinder for StuckFinder {
        fn next_pass(
            &self,
            _satellite: &SatelliteRecord,
            _observer: &GroundStation,
            _after: DateTime<Utc>,
        ) -> Result<PassEvents, PredictError> {
            Ok(PassEvents {
                rise: self.transit - Duration::minutes(5),
                transit: self.transit,
                set: self.transit + Duration::minutes(5),
            })
        }
    }

    impl OrbitalStateProvider for StuckFinder {
        fn state_at(
            &self,
            _satellite: &SatelliteRecord,
            _observer: &GroundStation,
            at: DateTime<Utc>,
        ) -> Result<OrbitalState, PredictError> {
            Ok(OrbitalState {
                timestamp: at,
                sub_latitude_deg: 0.0,
                sub_longitude_deg: 0.0,
                altitude_km: ALTITUDE_KM,
                azimuth_deg: 0.0,
                elevation_deg: 10.0,
                range_km: 2000.0,
                eclipsed: false,
            })
        }
    }

    impl OrbitNumbering for StuckFinder {
        fn orbit_number_at(
            &self,
            _satellite: &SatelliteRecord,
            _at: DateTime<Utc>,
        ) -> Result<i64, PredictError> {
            Ok(0)
        }
    }

    #[test]
    fn non_advancing_finder_fails_instead_of_hanging() {
        let window = day_window();
        let finder = StuckFinder {
            transit: window.start + Duration::hours(1),
        };

        let err = search_passes(&equator(), &iss(0), &window, &SearchOptions::new(45.0), &finder)
            .unwrap_err();
        assert!(matches!(err, SearchError::NoProgress { .. }));
    }

    /// Creeps forward a millisecond per call.
    struct CreepingFinder {
        calls: Cell<usize>,
    }

    impl PassEventFinder for CreepingFinder {
        fn next_pass(
            &self,
            _satellite: &SatelliteRecord,
            _observer: &GroundStation,
            after: DateTime<Utc>,
        ) -> Result<PassEvents, PredictError> {
            self.calls.set(self.calls.get() + 1);
            let transit = after + Duration::milliseconds(1);
            Ok(PassEvents {
                rise: after,
                transit,
                set: transit - Duration::milliseconds(999),
            })
        }
    }

    impl OrbitalStateProvider for CreepingFinder {
        fn state_at(
            &self,
            _satellite: &SatelliteRecord,
            _observer: &GroundStation,
            at: DateTime<Utc>,
        ) -> Result<OrbitalState, PredictError> {
            Ok(OrbitalState {
                timestamp: at,
                sub_latitude_deg: 0.0,
                sub_longitude_deg: 0.0,
                altitude_km: ALTITUDE_KM,
                azimuth_deg: 0.0,
                elevation_deg: 10.0,
                range_km: 2000.0,
                eclipsed: true,
            })
        }
    }

    impl OrbitNumbering for CreepingFinder {
        fn orbit_number_at(
            &self,
            _satellite: &SatelliteRecord,
            _at: DateTime<Utc>,
        ) -> Result<i64, PredictError> {
            Ok(0)
        }
    }

    #[test]
    fn iteration_limit_bounds_a_creeping_finder() {
        let window = day_window();
        let finder = CreepingFinder {
            calls: Cell::new(0),
        };
        let options = SearchOptions {
            max_off_nadir_deg: 45.0,
            max_iterations: 50,
        };

        let err = search_passes(&equator(), &iss(0), &window, &options, &finder).unwrap_err();
        assert!(matches!(err, SearchError::IterationLimit { limit: 50, .. }));
        assert_eq!(finder.calls.get(), 50);
    }

    #[test]
    fn below_horizon_transit_is_a_geometry_error() {
        let window = day_window();
        let orbit = ScriptedOrbit::circular(window.start, Duration::minutes(100), &[(-5.0, false)]);

        let err = search_passes(&equator(), &iss(0), &window, &SearchOptions::new(45.0), &orbit)
            .unwrap_err();
        assert!(matches!(err, SearchError::GeometryDomain { .. }));
    }

    #[test]
    fn collaborator_failure_is_fatal() {
        let window = day_window();
        let orbit = MissingState(ScriptedOrbit::circular(
            window.start,
            Duration::minutes(100),
            &[(80.0, false)],
        ));

        let err = search_passes(&equator(), &iss(0), &window, &SearchOptions::new(45.0), &orbit)
            .unwrap_err();
        assert!(matches!(
            err,
            SearchError::Predict(PredictError::Propagation(_))
        ));
    }

    struct MissingState(ScriptedOrbit);

    impl PassEventFinder for MissingState {
        fn next_pass(
            &self,
            satellite: &SatelliteRecord,
            observer: &GroundStation,
            after: DateTime<Utc>,
        ) -> Result<PassEvents, PredictError> {
            self.0.next_pass(satellite, observer, after)
        }
    }

    impl OrbitalStateProvider for MissingState {
        fn state_at(
            &self,
            _satellite: &SatelliteRecord,
            _observer: &GroundStation,
            at: DateTime<Utc>,
        ) -> Result<OrbitalState, PredictError> {
            Err(PredictError::Propagation(format!("diverged at {}", at)))
        }
    }

    impl OrbitNumbering for MissingState {
        fn orbit_number_at(
            &self,
            satellite: &SatelliteRecord,
            at: DateTime<Utc>,
        ) -> Result<i64, PredictError> {
            self.0.orbit_number_at(satellite, at)
        }
    }
}
