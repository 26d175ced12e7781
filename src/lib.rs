//! # Residoodle
//!
//! Schedule reconciliation and availability engine for resident shift
//! calendars.
//!
//! The engine reconciles an observed shift schedule against the academic-year
//! block calendar: residents with too few observed shifts in a half-block are
//! inferred to be rotating off-service and backfilled with full-day records.
//! The merged timeline is expanded into an hourly occupancy grid, which in
//! turn drives date scoring, ranking, and per-resident availability
//! classification for event planning.
//!
//! ## Architecture
//!
//! - [`models`]: shift records, residents, and the block boundary table
//! - [`source`]: the [`source::ScheduleSource`] trait, raw-entry
//!   normalization, and the per-session fetch cache
//! - [`services`]: off-service inference, timeline merging, the occupancy
//!   grid, availability scoring, and the query orchestrator
//! - [`loaders`]: CSV loaders for the roster and block table
//! - [`config`]: TOML/env configuration
//!
//! ## Example
//!
//! ```no_run
//! use residoodle::config::AppConfig;
//! use residoodle::loaders::{load_block_table, load_roster};
//! use residoodle::services::{AvailabilityEngine, AvailabilityQuery};
//! use residoodle::source::LocalScheduleSource;
//! use chrono::NaiveDate;
//! use std::collections::BTreeSet;
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = AppConfig::default();
//! let roster = load_roster("data/residents.csv")?;
//! let blocks = load_block_table("data/blocks.csv")?;
//! let source = Arc::new(LocalScheduleSource::new(Vec::new()));
//! let engine = AvailabilityEngine::new(source, roster, blocks, config);
//!
//! let query = AvailabilityQuery {
//!     start_date: NaiveDate::from_ymd_opt(2023, 7, 1).unwrap(),
//!     end_date: NaiveDate::from_ymd_opt(2023, 7, 14).unwrap(),
//!     window: engine.default_window(),
//!     residents: BTreeSet::from(["A Smith".to_string()]),
//! };
//! let report = engine.run(&query).await?;
//! println!("best dates: {:?}", report.best_dates);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod loaders;
pub mod models;
pub mod services;
pub mod source;

pub use config::AppConfig;
pub use error::{EngineError, EngineResult};
pub use models::{BlockTable, Resident, Roster, ShiftRecord, ShiftSource};
pub use services::{AvailabilityEngine, AvailabilityQuery, AvailabilityReport, EventWindow};
pub use source::{ScheduleSource, SourceError};
