use crate::search::Pass;

/// Chronological order by displayed date and time of day.
///
/// The sort is stable: passes that display the same date and time keep the
/// order in which their satellite/AOI pairs were searched.
pub fn assemble(mut passes: Vec<Pass>) -> Vec<Pass> {
    passes.sort_by_cached_key(|p| (p.date_str(), p.time_str()));
    passes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::format::tests::pass;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn orders_by_date_then_time() {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let passes = vec![
            pass("late", base + Duration::days(1)),
            pass("noon", base),
            pass("morning", base - Duration::hours(3)),
        ];

        let names: Vec<_> = assemble(passes).into_iter().map(|p| p.satellite).collect();
        assert_eq!(names, vec!["morning", "noon", "late"]);
    }

    #[test]
    fn equal_display_time_keeps_enumeration_order() {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        // 30 ms apart, both shown as 12:00:00.0
        let passes = vec![
            pass("B-first", base + Duration::milliseconds(30)),
            pass("A-second", base),
            pass("earlier", base - Duration::seconds(1)),
        ];

        let names: Vec<_> = assemble(passes).into_iter().map(|p| p.satellite).collect();
        assert_eq!(names, vec!["earlier", "B-first", "A-second"]);
    }
}
