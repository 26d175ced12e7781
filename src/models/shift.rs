//! Shift records and the resident roster.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Shift code used for synthetic off-service placeholder records.
pub const OFF_SERVICE_CODE: &str = "OS";

/// Where a shift record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftSource {
    /// Observed emergency-department duty from the authoritative calendar.
    OnService,
    /// Synthetic full-day record for an inferred off-service rotation.
    OffService,
    /// Didactic conference time.
    Conference,
    /// Observed record whose raw type string was not recognized.
    Unknown,
}

/// One shift for one resident, observed or inferred.
///
/// Invariant: `start < end`. Inferred records always span a single calendar
/// day (00:00:00 to 23:59:59 local); observed shifts may be shorter and may
/// cross midnight.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftRecord {
    pub resident_id: String,
    pub shift_code: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub source: ShiftSource,
    pub facility: String,
}

impl ShiftRecord {
    /// The local calendar date this shift starts on. Per-date attribution
    /// throughout the engine uses the start date, even for shifts that cross
    /// midnight.
    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Local wall-clock start, used for hour-grid arithmetic.
    pub fn start_local(&self) -> NaiveDateTime {
        self.start.naive_local()
    }

    /// Local wall-clock end.
    pub fn end_local(&self) -> NaiveDateTime {
        self.end.naive_local()
    }

    pub fn is_off_service(&self) -> bool {
        self.source == ShiftSource::OffService
    }
}

/// A resident in the program. Immutable reference data, loaded once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resident {
    /// Canonical identifier, e.g. "A Smith" (first initial + last name),
    /// matching how the calendar source names people.
    pub id: String,
    pub display_name: String,
    /// Postgraduate year (1-based).
    pub class_year: u8,
}

/// The resident roster, with lookup helpers.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    residents: Vec<Resident>,
}

impl Roster {
    pub fn new(residents: Vec<Resident>) -> Self {
        Self { residents }
    }

    pub fn residents(&self) -> &[Resident] {
        &self.residents
    }

    pub fn len(&self) -> usize {
        self.residents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residents.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.residents.iter().any(|r| r.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Resident> {
        self.residents.iter().find(|r| r.id == id)
    }

    /// Ids of every resident in a postgraduate class, for whole-class
    /// selection.
    pub fn class(&self, class_year: u8) -> Vec<&str> {
        self.residents
            .iter()
            .filter(|r| r.class_year == class_year)
            .map(|r| r.id.as_str())
            .collect()
    }
}
