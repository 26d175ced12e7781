//! Service layer: the computation pipeline behind an availability query.
//!
//! Leaf-first: off-service inference backfills unobserved rotations, the
//! merger produces the unified timeline, the occupancy grid expands it into
//! hourly counts, and the availability module scores, ranks, and classifies.
//! `query` orchestrates the whole pipeline.

pub mod availability;
pub mod merge;
pub mod occupancy;
pub mod off_service;
pub mod query;

#[cfg(test)]
#[path = "availability_tests.rs"]
mod availability_tests;

pub use availability::{
    best_dates, classify_day, free_matrix, DateScore, DayAvailability, EventWindow, FreeMatrix,
    ResidentLabel,
};
pub use merge::{merge, ScheduleTimeline};
pub use occupancy::OccupancyGrid;
pub use off_service::infer_off_service;
pub use query::{AvailabilityEngine, AvailabilityQuery, AvailabilityReport};
