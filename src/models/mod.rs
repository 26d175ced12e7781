//! Typed domain records for the availability engine.
//!
//! The engine works over explicit record types plus small index structures
//! rather than a generic tabular abstraction: shift records, the resident
//! roster, and the academic-year block table.

pub mod block;
pub mod shift;

pub use block::{BlockHalf, BlockId, BlockRow, BlockTable, HalfBlock};
pub use shift::{Resident, Roster, ShiftRecord, ShiftSource, OFF_SERVICE_CODE};
