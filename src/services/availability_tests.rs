#[cfg(test)]
mod tests {
    use crate::models::{ShiftRecord, ShiftSource, OFF_SERVICE_CODE};
    use crate::services::availability::{
        best_dates, classify_day, free_matrix, EventWindow,
    };
    use crate::services::merge::merge;
    use crate::services::occupancy::OccupancyGrid;
    use chrono::{NaiveDate, NaiveTime, TimeZone};
    use chrono_tz::America::Detroit;
    use std::collections::BTreeSet;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 7, d).unwrap()
    }

    fn window() -> EventWindow {
        EventWindow::new(time(17, 0), time(22, 0))
    }

    fn shift(resident: &str, code: &str, day: u32, start_h: u32, end_h: u32) -> ShiftRecord {
        ShiftRecord {
            resident_id: resident.to_string(),
            shift_code: code.to_string(),
            start: Detroit.with_ymd_and_hms(2023, 7, day, start_h, 0, 0).unwrap(),
            end: Detroit.with_ymd_and_hms(2023, 7, day, end_h, 0, 0).unwrap(),
            source: ShiftSource::OnService,
            facility: "UM".to_string(),
        }
    }

    fn selection(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn window_validation() {
        assert!(window().validate().is_ok());
        assert!(EventWindow::new(time(22, 0), time(17, 0)).validate().is_err());
        // zero-width window is allowed
        assert!(EventWindow::new(time(17, 0), time(17, 0)).validate().is_ok());
    }

    #[test]
    fn hour_labels_are_inclusive_of_both_ends() {
        assert_eq!(window().hour_labels(), vec![17, 18, 19, 20, 21, 22]);
        assert_eq!(
            EventWindow::new(time(17, 30), time(21, 30)).hour_labels(),
            vec![18, 19, 20, 21]
        );
    }

    #[test]
    fn free_matrix_counts_unoccupied_residents() {
        let timeline = merge(vec![shift("A Smith", "E1", 4, 17, 23)], vec![]);
        let grid = OccupancyGrid::build(&timeline);
        let dates = vec![date(4), date(5)];
        let matrix = free_matrix(&grid, 2, &dates, &window());

        assert_eq!(matrix.hours.len(), 6);
        // A Smith works 17:00-23:00 on 7/4; nobody works 7/5.
        for (row, hour) in matrix.cells.iter().zip(&matrix.hours) {
            assert_eq!(row[0], 1, "hour {hour} on 7/4");
            assert_eq!(row[1], 2, "hour {hour} on 7/5");
        }
        assert_eq!(matrix.date_averages(), vec![1.0, 2.0]);
    }

    #[test]
    fn best_dates_sorts_descending_with_earliest_date_tiebreak() {
        // 7/4 and 7/5 tie; 7/6 is worse. Top-2 must be [7/4, 7/5].
        let timeline = merge(
            vec![
                shift("A Smith", "E1", 4, 8, 12),
                shift("A Smith", "E1", 5, 8, 12),
                shift("A Smith", "E1", 6, 17, 23),
                shift("B Jones", "E2", 6, 17, 23),
            ],
            vec![],
        );
        let grid = OccupancyGrid::build(&timeline);
        let dates = vec![date(4), date(5), date(6)];
        let matrix = free_matrix(&grid, 4, &dates, &window());

        let ranked = best_dates(&matrix, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].date, date(4));
        assert_eq!(ranked[1].date, date(5));
        assert_eq!(ranked[0].avg_free, ranked[1].avg_free);
    }

    #[test]
    fn best_dates_returns_fewer_when_range_is_short() {
        let grid = OccupancyGrid::build(&merge(vec![], vec![]));
        let matrix = free_matrix(&grid, 1, &[date(4)], &window());
        assert_eq!(best_dates(&matrix, 3).len(), 1);
    }

    #[test]
    fn classify_four_buckets() {
        // Window 17:00-22:00 on 7/4.
        let timeline = merge(
            vec![
                shift("A Partial", "E1", 4, 18, 20),
                shift("B Working", "E2", 4, 16, 23),
                shift("D Free", "M1", 4, 8, 12),
            ],
            vec![],
        );
        let selection = selection(&["A Partial", "B Working", "C Off", "D Free"]);
        let day = classify_day(&timeline, &selection, date(4), &window());

        assert_eq!(day.partially_free.len(), 1);
        assert_eq!(day.partially_free[0].resident_id, "A Partial");
        assert_eq!(day.partially_free[0].label, "E1");

        assert_eq!(day.working.len(), 1);
        assert_eq!(day.working[0].resident_id, "B Working");

        assert_eq!(day.off.len(), 1);
        assert_eq!(day.off[0].resident_id, "C Off");
        assert_eq!(day.off[0].label, "Off");

        assert_eq!(day.free.len(), 1);
        assert_eq!(day.free[0].resident_id, "D Free");
        assert_eq!(day.free[0].label, "M1");

        assert_eq!(day.available_count(), 2);
    }

    #[test]
    fn off_service_resident_classifies_as_working_all_day() {
        let os_day = ShiftRecord {
            resident_id: "A Smith".to_string(),
            shift_code: OFF_SERVICE_CODE.to_string(),
            start: Detroit.with_ymd_and_hms(2023, 7, 4, 0, 0, 0).unwrap(),
            end: Detroit.with_ymd_and_hms(2023, 7, 4, 23, 59, 59).unwrap(),
            source: ShiftSource::OffService,
            facility: "OS".to_string(),
        };
        let timeline = merge(vec![], vec![os_day]);
        let day = classify_day(&timeline, &selection(&["A Smith"]), date(4), &window());

        assert_eq!(day.working.len(), 1);
        assert_eq!(day.working[0].label, OFF_SERVICE_CODE);
    }

    #[test]
    fn full_coverage_wins_over_partial_records() {
        // One record fully covers the window, another only grazes it; the
        // resident is Working.
        let timeline = merge(
            vec![
                shift("A Smith", "E1", 4, 12, 18),
                shift("A Smith", "N1", 4, 16, 23),
            ],
            vec![],
        );
        let day = classify_day(&timeline, &selection(&["A Smith"]), date(4), &window());
        assert_eq!(day.working.len(), 1);
        assert_eq!(day.working[0].label, "N1");
    }

    #[test]
    fn shift_ending_at_window_start_is_partial() {
        // 12:00-17:00 touches the 17:00 mark, mirroring the inclusive hourly
        // expansion: partially free, not free.
        let timeline = merge(vec![shift("A Smith", "E1", 4, 12, 17)], vec![]);
        let day = classify_day(&timeline, &selection(&["A Smith"]), date(4), &window());
        assert_eq!(day.partially_free.len(), 1);
    }
}
