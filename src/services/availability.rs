//! Availability scoring, ranking, and per-resident classification.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::error::{EngineError, EngineResult};

use super::merge::ScheduleTimeline;
use super::occupancy::OccupancyGrid;

/// A daily time window an event should fall in, e.g. 17:00 to 22:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EventWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl EventWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Fails with `InvalidWindow` when the window ends before it starts.
    /// Queries call this before anything else happens, fetch included.
    pub fn validate(&self) -> EngineResult<()> {
        if self.end < self.start {
            return Err(EngineError::InvalidWindow {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Hour-of-day labels whose on-the-hour mark falls inside the window,
    /// both ends inclusive: 17:00-22:00 yields 17 through 22.
    pub(crate) fn hour_labels(&self) -> Vec<u32> {
        (0u32..24)
            .filter_map(|h| NaiveTime::from_hms_opt(h, 0, 0).map(|t| (h, t)))
            .filter(|(_, t)| self.start <= *t && *t <= self.end)
            .map(|(h, _)| h)
            .collect()
    }
}

/// One ranked date with its average free-resident count over the window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateScore {
    pub date: NaiveDate,
    pub avg_free: f64,
}

/// Hour-of-day by date matrix of free-resident counts for display, plus the
/// per-date averages that ranking consumes.
#[derive(Debug, Clone, Serialize)]
pub struct FreeMatrix {
    pub hours: Vec<u32>,
    pub dates: Vec<NaiveDate>,
    /// Row per hour label, column per date.
    pub cells: Vec<Vec<usize>>,
}

impl FreeMatrix {
    /// Average free-resident count per date column. Zero when the window
    /// contains no on-the-hour labels.
    pub fn date_averages(&self) -> Vec<f64> {
        if self.hours.is_empty() {
            return vec![0.0; self.dates.len()];
        }
        (0..self.dates.len())
            .map(|col| {
                let sum: usize = self.cells.iter().map(|row| row[col]).sum();
                sum as f64 / self.hours.len() as f64
            })
            .collect()
    }
}

/// Build the free-resident matrix: for each window hour and date,
/// `selection size − distinct residents on duty`.
pub fn free_matrix(
    grid: &OccupancyGrid,
    n_residents: usize,
    dates: &[NaiveDate],
    window: &EventWindow,
) -> FreeMatrix {
    let hours = window.hour_labels();
    let cells = hours
        .iter()
        .map(|&hour| {
            dates
                .iter()
                .map(|&date| n_residents.saturating_sub(grid.count(date, hour)))
                .collect()
        })
        .collect();

    FreeMatrix {
        hours,
        dates: dates.to_vec(),
        cells,
    }
}

/// Rank dates descending by average free-resident count, ties broken by
/// earliest date, and keep the best `top_n`.
pub fn best_dates(matrix: &FreeMatrix, top_n: usize) -> Vec<DateScore> {
    let mut scores: Vec<DateScore> = matrix
        .dates
        .iter()
        .zip(matrix.date_averages())
        .map(|(&date, avg_free)| DateScore { date, avg_free })
        .collect();

    scores.sort_by(|a, b| {
        b.avg_free
            .partial_cmp(&a.avg_free)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.date.cmp(&b.date))
    });
    scores.truncate(top_n);
    scores
}

/// A resident paired with the shift label shown for them ("Off" when they
/// have no record that day).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResidentLabel {
    pub resident_id: String,
    pub label: String,
}

/// Four-bucket availability breakdown of one date.
#[derive(Debug, Clone, Serialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    /// A record covers the entire window.
    pub working: Vec<ResidentLabel>,
    /// A record covers part, but not all, of the window.
    pub partially_free: Vec<ResidentLabel>,
    /// Records exist that day but none overlaps the window.
    pub free: Vec<ResidentLabel>,
    /// No record at all that day.
    pub off: Vec<ResidentLabel>,
}

impl DayAvailability {
    /// Residents likely able to attend: free plus fully unscheduled.
    pub fn available_count(&self) -> usize {
        self.free.len() + self.off.len()
    }
}

/// How many hourly marks of a record starting at `start` and ending at `end`
/// land inside `[window_start, window_end]`. Marks step from the record's own
/// start, so a 18:30 shift produces 18:30, 19:30, ... like the hourly
/// expansion the scoring side uses, but with both window ends inclusive.
fn covered_marks(
    start: chrono::NaiveDateTime,
    end: chrono::NaiveDateTime,
    window_start: chrono::NaiveDateTime,
    window_end: chrono::NaiveDateTime,
) -> usize {
    let mut covered = 0;
    let mut t = start;
    while t <= end {
        if t >= window_start && t <= window_end {
            covered += 1;
        }
        t += Duration::hours(1);
    }
    covered
}

/// Classify every selected resident for one date against the window.
///
/// Classification looks at records *starting* on the date. A record covering
/// every hourly mark of the window makes the resident Working; covering some
/// marks makes them PartiallyFree; records that never touch the window leave
/// them Free; no records at all is Off. Full-day inferred off-service records
/// cover any window, so off-service residents surface as Working with the
/// "OS" label.
pub fn classify_day(
    timeline: &ScheduleTimeline,
    selection: &BTreeSet<String>,
    date: NaiveDate,
    window: &EventWindow,
) -> DayAvailability {
    let window_start = date.and_time(window.start);
    let window_end = date.and_time(window.end);
    let target_marks = ((window_end - window_start).num_hours() as usize) + 1;

    let mut day = DayAvailability {
        date,
        working: Vec::new(),
        partially_free: Vec::new(),
        free: Vec::new(),
        off: Vec::new(),
    };

    for resident_id in selection {
        let records: Vec<_> = timeline
            .starting_on(date)
            .filter(|r| &r.resident_id == resident_id)
            .collect();

        if records.is_empty() {
            day.off.push(ResidentLabel {
                resident_id: resident_id.clone(),
                label: "Off".to_string(),
            });
            continue;
        }

        let mut best_partial: Option<(usize, &str)> = None;
        let mut full: Option<&str> = None;
        for record in &records {
            let covered = covered_marks(
                record.start_local(),
                record.end_local(),
                window_start,
                window_end,
            );
            if covered >= target_marks {
                full = Some(record.shift_code.as_str());
                break;
            }
            if covered > 0 && best_partial.map_or(true, |(best, _)| covered > best) {
                best_partial = Some((covered, record.shift_code.as_str()));
            }
        }

        let (bucket, label) = match (full, best_partial) {
            (Some(code), _) => (&mut day.working, code),
            (None, Some((_, code))) => (&mut day.partially_free, code),
            (None, None) => (&mut day.free, records[0].shift_code.as_str()),
        };
        bucket.push(ResidentLabel {
            resident_id: resident_id.clone(),
            label: label.to_string(),
        });
    }

    day
}
