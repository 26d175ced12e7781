//! Error types for availability queries.
//!
//! A query is all-or-nothing: any of these errors aborts it with no partial
//! output. None are retried inside the engine; callers decide whether to
//! prompt for corrected input and re-invoke.

use chrono::{NaiveDate, NaiveTime};

use crate::source::SourceError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Fatal error kinds surfaced by an availability query.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The schedule source failed or returned an unusable payload.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// A requested date falls outside the loaded block table.
    #[error("date {date} is outside the block table ({first} to {last})")]
    OutOfRange {
        date: NaiveDate,
        first: NaiveDate,
        last: NaiveDate,
    },

    /// The daily event window ends before it starts.
    #[error("event window end {end} is before start {start}")]
    InvalidWindow { start: NaiveTime, end: NaiveTime },

    /// No residents were selected for the query.
    #[error("no residents selected")]
    EmptySelection,
}
