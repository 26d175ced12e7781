//! Shift record normalization.
//!
//! Raw ShiftAdmin-style entries arrive with name parts, a short shift code,
//! and naive local timestamps. Normalization produces uniform
//! [`ShiftRecord`]s: the resident id is `"<first initial> <last name>"` (the
//! same convention the roster uses), timestamps are localized to the program
//! timezone, and the raw shift-type string is mapped onto [`ShiftSource`].
//!
//! Entries that fail to parse are skipped with a warning rather than failing
//! the fetch; a payload where *nothing* parses is surfaced as
//! [`SourceError::EmptyPayload`] by the caller.

use chrono::{NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::models::{Roster, ShiftRecord, ShiftSource};

/// One raw entry from the schedule source, field names matching the upstream
/// JSON payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawShiftEntry {
    pub first_name: String,
    pub last_name: String,
    pub shift_short_name: String,
    #[serde(default)]
    pub facility_abbreviation: String,
    pub shift_start: String,
    pub shift_end: String,
    #[serde(default)]
    pub group_short_name: String,
    #[serde(default)]
    pub shift_type: Option<String>,
}

impl RawShiftEntry {
    /// Resident id in roster convention: first initial + space + last name.
    pub fn resident_id(&self) -> String {
        match self.first_name.chars().next() {
            Some(initial) => format!("{} {}", initial, self.last_name),
            None => self.last_name.clone(),
        }
    }
}

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

pub(crate) fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw.trim(), fmt).ok())
}

fn classify(shift_type: Option<&str>) -> ShiftSource {
    let Some(raw) = shift_type else {
        return ShiftSource::OnService;
    };
    let t = raw.trim().to_ascii_lowercase();
    if t.is_empty() {
        ShiftSource::OnService
    } else if t.contains("conference") {
        ShiftSource::Conference
    } else if t.contains("off service") || t == "os" {
        ShiftSource::OffService
    } else if t.contains("shift")
        || t.contains("morning")
        || t.contains("evening")
        || t.contains("night")
        || t == "ed"
    {
        ShiftSource::OnService
    } else {
        ShiftSource::Unknown
    }
}

/// Convert raw entries into normalized shift records.
///
/// Entries for people not on the roster are dropped (the upstream calendar
/// covers other groups too), as are entries with unparseable timestamps or
/// `start >= end`.
pub fn normalize_entries(entries: &[RawShiftEntry], tz: Tz, roster: &Roster) -> Vec<ShiftRecord> {
    let mut records = Vec::with_capacity(entries.len());

    for entry in entries {
        let resident_id = entry.resident_id();
        if !roster.contains(&resident_id) {
            log::debug!("skipping shift for non-roster person {resident_id}");
            continue;
        }

        let (Some(start_naive), Some(end_naive)) = (
            parse_timestamp(&entry.shift_start),
            parse_timestamp(&entry.shift_end),
        ) else {
            log::warn!(
                "skipping shift {} for {resident_id}: unparseable timestamps ({:?}, {:?})",
                entry.shift_short_name,
                entry.shift_start,
                entry.shift_end
            );
            continue;
        };

        let (Some(start), Some(end)) = (
            tz.from_local_datetime(&start_naive).earliest(),
            tz.from_local_datetime(&end_naive).earliest(),
        ) else {
            log::warn!(
                "skipping shift {} for {resident_id}: timestamps fall in a local-time gap",
                entry.shift_short_name
            );
            continue;
        };

        if start >= end {
            log::warn!(
                "skipping shift {} for {resident_id}: start {start} is not before end {end}",
                entry.shift_short_name
            );
            continue;
        }

        records.push(ShiftRecord {
            resident_id,
            shift_code: entry.shift_short_name.trim().to_string(),
            start,
            end,
            source: classify(entry.shift_type.as_deref()),
            facility: entry.facility_abbreviation.trim().to_string(),
        });
    }

    records
}
