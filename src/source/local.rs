//! In-memory schedule source for unit testing and local development.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::normalize::parse_timestamp;
use super::{RawShiftEntry, ScheduleSource, SourceError};

/// A schedule source backed by a fixed set of raw entries.
///
/// `fetch` returns the entries whose shift starts within the requested range.
/// Entries with unparseable timestamps are passed through unfiltered so the
/// normalizer's skip-and-warn behavior stays testable.
#[derive(Debug, Clone, Default)]
pub struct LocalScheduleSource {
    entries: Vec<RawShiftEntry>,
}

impl LocalScheduleSource {
    pub fn new(entries: Vec<RawShiftEntry>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl ScheduleSource for LocalScheduleSource {
    async fn fetch(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawShiftEntry>, SourceError> {
        if end < start {
            return Err(SourceError::InvalidRange { start, end });
        }

        Ok(self
            .entries
            .iter()
            .filter(|e| match parse_timestamp(&e.shift_start) {
                Some(ts) => {
                    let d = ts.date();
                    start <= d && d <= end
                }
                None => true,
            })
            .cloned()
            .collect())
    }
}
