//! Unified schedule merging.
//!
//! Observed and inferred shift records are concatenated into one
//! chronologically ordered timeline, the shared backbone every downstream
//! query step reads from. No overlap resolution happens here: a resident may
//! hold an observed and an inferred record over the same hours, and the
//! occupancy grid counts them once.

use chrono::NaiveDate;

use crate::models::ShiftRecord;

/// The merged, ordered collection of shift records for one query.
/// Immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct ScheduleTimeline {
    records: Vec<ShiftRecord>,
}

impl ScheduleTimeline {
    pub fn records(&self) -> &[ShiftRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose shift starts on the given local date, in timeline order.
    pub fn starting_on(&self, date: NaiveDate) -> impl Iterator<Item = &ShiftRecord> {
        self.records.iter().filter(move |r| r.start_date() == date)
    }

    /// Records belonging to one resident, in timeline order.
    pub fn for_resident<'a>(&'a self, resident_id: &'a str) -> impl Iterator<Item = &'a ShiftRecord> {
        self.records
            .iter()
            .filter(move |r| r.resident_id == resident_id)
    }
}

/// Merge observed and inferred records into one timeline, sorted by start
/// timestamp ascending with ties broken by resident id then shift code.
/// The sort is stable, so the ordering is fully deterministic.
pub fn merge(observed: Vec<ShiftRecord>, inferred: Vec<ShiftRecord>) -> ScheduleTimeline {
    let mut records = observed;
    records.extend(inferred);
    records.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| a.resident_id.cmp(&b.resident_id))
            .then_with(|| a.shift_code.cmp(&b.shift_code))
    });
    ScheduleTimeline { records }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShiftSource;
    use chrono::TimeZone;
    use chrono_tz::America::Detroit;
    use proptest::prelude::*;

    fn record(resident: &str, code: &str, day: u32, hour: u32) -> ShiftRecord {
        ShiftRecord {
            resident_id: resident.to_string(),
            shift_code: code.to_string(),
            start: Detroit.with_ymd_and_hms(2023, 1, day, hour, 0, 0).unwrap(),
            end: Detroit
                .with_ymd_and_hms(2023, 1, day, hour + 1, 0, 0)
                .unwrap(),
            source: ShiftSource::OnService,
            facility: "UM".to_string(),
        }
    }

    #[test]
    fn sorts_by_start_then_resident_then_code() {
        let merged = merge(
            vec![
                record("B Jones", "E1", 2, 8),
                record("A Smith", "N1", 1, 8),
            ],
            vec![
                record("A Smith", "E1", 2, 8),
                record("A Smith", "A1", 2, 8),
            ],
        );

        let order: Vec<_> = merged
            .records()
            .iter()
            .map(|r| (r.resident_id.as_str(), r.shift_code.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("A Smith", "N1"),
                ("A Smith", "A1"),
                ("A Smith", "E1"),
                ("B Jones", "E1"),
            ]
        );
    }

    #[test]
    fn empty_inferred_set_leaves_observed_unchanged() {
        let observed = vec![
            record("A Smith", "E1", 1, 8),
            record("A Smith", "N1", 1, 22),
            record("B Jones", "E1", 2, 8),
        ];
        let merged = merge(observed.clone(), vec![]);
        assert_eq!(merged.records(), observed.as_slice());
    }

    #[test]
    fn starting_on_filters_by_local_start_date() {
        let overnight = ShiftRecord {
            end: Detroit.with_ymd_and_hms(2023, 1, 2, 6, 0, 0).unwrap(),
            ..record("A Smith", "N1", 1, 22)
        };
        let merged = merge(vec![overnight, record("B Jones", "E1", 2, 8)], vec![]);

        let day1: Vec<_> = merged
            .starting_on(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap())
            .collect();
        assert_eq!(day1.len(), 1);
        assert_eq!(day1[0].resident_id, "A Smith");
    }

    proptest! {
        // Merge output is sorted and is a permutation of its inputs.
        #[test]
        fn merge_is_sorted_permutation(
            days_a in proptest::collection::vec(1u32..28, 0..12),
            days_b in proptest::collection::vec(1u32..28, 0..12),
        ) {
            let observed: Vec<_> = days_a.iter().map(|d| record("A Smith", "E1", *d, 8)).collect();
            let inferred: Vec<_> = days_b.iter().map(|d| record("B Jones", "OS", *d, 0)).collect();

            let mut expected: Vec<_> = observed.iter().chain(&inferred).cloned().collect();
            expected.sort_by(|a, b| {
                a.start
                    .cmp(&b.start)
                    .then_with(|| a.resident_id.cmp(&b.resident_id))
                    .then_with(|| a.shift_code.cmp(&b.shift_code))
            });

            let merged = merge(observed, inferred);
            prop_assert_eq!(merged.records(), expected.as_slice());
            for pair in merged.records().windows(2) {
                prop_assert!(pair[0].start <= pair[1].start);
            }
        }
    }
}
