//! Query orchestration.
//!
//! One query runs start-to-finish on the calling task: validate, fetch
//! (through the per-session cache), normalize, infer, merge, grid, score,
//! classify. Any failure aborts the query with no partial output. The only
//! cross-query state is the fetch cache.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{BlockTable, Roster, ShiftRecord};
use crate::source::{normalize_entries, FetchCache, ScheduleSource, SourceError};

use super::availability::{
    best_dates, classify_day, free_matrix, DateScore, DayAvailability, EventWindow, FreeMatrix,
};
use super::merge::merge;
use super::occupancy::OccupancyGrid;
use super::off_service::infer_off_service;

/// One availability question: a date range, a daily time window, and the
/// residents who should attend.
#[derive(Debug, Clone)]
pub struct AvailabilityQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub window: EventWindow,
    pub residents: BTreeSet<String>,
}

/// Everything a caller needs to present: ranked dates, the four-bucket
/// breakdown of every date in the range, and the free-resident matrix.
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityReport {
    pub best_dates: Vec<DateScore>,
    pub days: Vec<DayAvailability>,
    pub free_matrix: FreeMatrix,
}

/// The availability engine: owns the schedule source, its cache, and the
/// reference data every query shares.
pub struct AvailabilityEngine {
    source: Arc<dyn ScheduleSource>,
    cache: FetchCache,
    roster: Roster,
    blocks: BlockTable,
    config: AppConfig,
}

impl AvailabilityEngine {
    pub fn new(
        source: Arc<dyn ScheduleSource>,
        roster: Roster,
        blocks: BlockTable,
        config: AppConfig,
    ) -> Self {
        Self {
            source,
            cache: FetchCache::new(),
            roster,
            blocks,
            config,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn blocks(&self) -> &BlockTable {
        &self.blocks
    }

    /// The configured default daily window (17:00-22:00 unless overridden).
    pub fn default_window(&self) -> EventWindow {
        EventWindow::new(
            self.config.default_window_start,
            self.config.default_window_end,
        )
    }

    /// Fetch and normalize observed records for a half-block-aligned span,
    /// read-through cached by the span. Repeated queries over the same span
    /// never hit the source again for the lifetime of the engine.
    async fn fetch_observed(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Arc<Vec<ShiftRecord>>> {
        if let Some(hit) = self.cache.get(start, end) {
            log::debug!("fetch cache hit for {start} to {end}");
            return Ok(hit);
        }

        log::info!("fetching schedule for {start} to {end}");
        let entries = self.source.fetch(start, end).await?;
        let records = normalize_entries(&entries, self.config.timezone, &self.roster);

        if records.is_empty() && start < end {
            return Err(EngineError::Source(SourceError::EmptyPayload { start, end }));
        }

        log::info!("normalized {} of {} raw entries", records.len(), entries.len());
        Ok(self.cache.insert(start, end, records))
    }

    /// Run one availability query.
    ///
    /// Input validation happens before any fetch: a reversed window or an
    /// empty selection fails without side effects, and dates outside the
    /// block table fail before the source is consulted.
    pub async fn run(&self, query: &AvailabilityQuery) -> EngineResult<AvailabilityReport> {
        query.window.validate()?;
        if query.residents.is_empty() {
            return Err(EngineError::EmptySelection);
        }
        if query.end_date < query.start_date {
            return Err(EngineError::Source(SourceError::InvalidRange {
                start: query.start_date,
                end: query.end_date,
            }));
        }

        // Widen the fetch to half-block edges so per-block shift counts are
        // complete; this also validates the range against the block table.
        let (span_start, span_end) =
            self.blocks.covering_span(query.start_date, query.end_date)?;

        let observed = self.fetch_observed(span_start, span_end).await?;
        let selected: Vec<ShiftRecord> = observed
            .iter()
            .filter(|r| query.residents.contains(&r.resident_id))
            .cloned()
            .collect();

        let inferred = infer_off_service(
            &selected,
            &self.blocks,
            &query.residents,
            (query.start_date, query.end_date),
            self.config.off_service_threshold,
            self.config.timezone,
        );
        log::info!(
            "merged {} observed and {} inferred records",
            selected.len(),
            inferred.len()
        );

        let timeline = merge(selected, inferred);
        let grid = OccupancyGrid::build(&timeline);

        let dates: Vec<NaiveDate> = query
            .start_date
            .iter_days()
            .take_while(|d| *d <= query.end_date)
            .collect();

        let matrix = free_matrix(&grid, query.residents.len(), &dates, &query.window);
        let ranked = best_dates(&matrix, self.config.best_dates);
        let days = dates
            .iter()
            .map(|&d| classify_day(&timeline, &query.residents, d, &query.window))
            .collect();

        Ok(AvailabilityReport {
            best_dates: ranked,
            days,
            free_matrix: matrix,
        })
    }
}
