//! Hourly occupancy grid.
//!
//! Every shift record is expanded into per-hour occupancy entries over the
//! whole hours it touches, producing a (date, hour-of-day) table of on-duty
//! resident counts. Cells hold the count of *distinct* residents: a resident
//! covered by two overlapping records at the same hour counts once.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use std::collections::{HashMap, HashSet};

use super::merge::ScheduleTimeline;

fn hour_floor(t: NaiveDateTime) -> NaiveDateTime {
    t.date().and_hms_opt(t.hour(), 0, 0).unwrap_or(t)
}

/// Hour-of-day by date table of distinct on-duty resident counts.
#[derive(Debug, Default)]
pub struct OccupancyGrid {
    cells: HashMap<(NaiveDate, u32), HashSet<String>>,
}

impl OccupancyGrid {
    /// Expand every record of the timeline into hourly occupancy. A record
    /// occupies each whole-hour cell in `[start, end)`, with the start
    /// truncated to its containing hour, so partial-hour shifts still occupy
    /// the hour they fall in. Records with `start == end` occupy nothing.
    pub fn build(timeline: &ScheduleTimeline) -> Self {
        let mut cells: HashMap<(NaiveDate, u32), HashSet<String>> = HashMap::new();

        for record in timeline.records() {
            if record.start == record.end {
                continue;
            }
            let end = record.end_local();
            let mut t = hour_floor(record.start_local());
            while t < end {
                cells
                    .entry((t.date(), t.hour()))
                    .or_default()
                    .insert(record.resident_id.clone());
                t += Duration::hours(1);
            }
        }

        Self { cells }
    }

    /// Number of distinct residents on duty at (date, hour-of-day).
    pub fn count(&self, date: NaiveDate, hour: u32) -> usize {
        self.cells
            .get(&(date, hour))
            .map(|residents| residents.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ShiftRecord, ShiftSource};
    use crate::services::merge::merge;
    use chrono::TimeZone;
    use chrono_tz::America::Detroit;

    fn shift(resident: &str, start: (u32, u32, u32), end: (u32, u32, u32)) -> ShiftRecord {
        ShiftRecord {
            resident_id: resident.to_string(),
            shift_code: "E1".to_string(),
            start: Detroit
                .with_ymd_and_hms(2023, 1, start.0, start.1, start.2, 0)
                .unwrap(),
            end: Detroit
                .with_ymd_and_hms(2023, 1, end.0, end.1, end.2, 0)
                .unwrap(),
            source: ShiftSource::OnService,
            facility: "UM".to_string(),
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, d).unwrap()
    }

    #[test]
    fn counts_hours_in_half_open_interval() {
        let grid = OccupancyGrid::build(&merge(vec![shift("A Smith", (5, 8, 0), (5, 12, 0))], vec![]));

        assert_eq!(grid.count(date(5), 7), 0);
        assert_eq!(grid.count(date(5), 8), 1);
        assert_eq!(grid.count(date(5), 11), 1);
        assert_eq!(grid.count(date(5), 12), 0);
    }

    #[test]
    fn overlapping_records_for_one_resident_count_once() {
        let grid = OccupancyGrid::build(&merge(
            vec![
                shift("A Smith", (5, 8, 0), (5, 12, 0)),
                shift("A Smith", (5, 10, 0), (5, 14, 0)),
            ],
            vec![],
        ));

        assert_eq!(grid.count(date(5), 10), 1);
        assert_eq!(grid.count(date(5), 11), 1);
        // union of the two records
        assert_eq!(grid.count(date(5), 13), 1);
    }

    #[test]
    fn distinct_residents_accumulate() {
        let grid = OccupancyGrid::build(&merge(
            vec![
                shift("A Smith", (5, 8, 0), (5, 12, 0)),
                shift("B Jones", (5, 10, 0), (5, 14, 0)),
            ],
            vec![],
        ));

        assert_eq!(grid.count(date(5), 9), 1);
        assert_eq!(grid.count(date(5), 10), 2);
        assert_eq!(grid.count(date(5), 13), 1);
    }

    #[test]
    fn partial_hour_shift_occupies_containing_hours() {
        let grid = OccupancyGrid::build(&merge(vec![shift("A Smith", (5, 18, 30), (5, 20, 0))], vec![]));

        assert_eq!(grid.count(date(5), 18), 1);
        assert_eq!(grid.count(date(5), 19), 1);
        assert_eq!(grid.count(date(5), 20), 0);
    }

    #[test]
    fn zero_length_shift_occupies_nothing() {
        let grid = OccupancyGrid::build(&merge(vec![shift("A Smith", (5, 18, 0), (5, 18, 0))], vec![]));
        for hour in 0..24 {
            assert_eq!(grid.count(date(5), hour), 0);
        }
    }

    #[test]
    fn overnight_shift_spills_into_next_date() {
        let grid = OccupancyGrid::build(&merge(vec![shift("A Smith", (5, 22, 0), (6, 2, 0))], vec![]));

        assert_eq!(grid.count(date(5), 23), 1);
        assert_eq!(grid.count(date(6), 0), 1);
        assert_eq!(grid.count(date(6), 1), 1);
        assert_eq!(grid.count(date(6), 2), 0);
    }
}
