//! Schedule source abstraction.
//!
//! The engine fetches raw shift entries through the [`ScheduleSource`] trait
//! so that storage backends can be swapped: an in-memory source for tests and
//! local development, and an HTTP-backed ShiftAdmin source behind the
//! `remote-source` feature. Fetches are cached per session by date range via
//! [`FetchCache`]; repeated queries over the same range never re-fetch.

pub mod cache;
pub mod local;
pub mod normalize;
#[cfg(feature = "remote-source")]
pub mod remote;

pub use cache::FetchCache;
pub use local::LocalScheduleSource;
pub use normalize::{normalize_entries, RawShiftEntry};
#[cfg(feature = "remote-source")]
pub use remote::ShiftAdminSource;

use async_trait::async_trait;
use chrono::NaiveDate;

/// Error type for schedule-source operations. All variants are fatal for the
/// query; the engine performs no retries and keeps no partial data.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The remote call itself failed.
    #[error("schedule source request failed: {message}")]
    Remote { message: String },

    /// The source answered but the payload could not be interpreted.
    #[error("schedule source returned an unusable payload: {message}")]
    Decode { message: String },

    /// The source returned zero interpretable records for a non-trivial range.
    #[error("schedule source returned no usable records for {start} to {end}")]
    EmptyPayload { start: NaiveDate, end: NaiveDate },

    /// The requested range is reversed.
    #[error("fetch range end {end} precedes start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

/// A provider of raw shift entries for a date range.
///
/// `fetch` returns every entry whose shift starts within the inclusive
/// range. Implementations must not return partially decoded payloads: either
/// the whole range decodes or the fetch fails.
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    async fn fetch(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawShiftEntry>, SourceError>;
}
