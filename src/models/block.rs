//! Academic-year block table and date-to-block resolution.
//!
//! The academic year is partitioned into numbered multi-week blocks. Each
//! block is split at its mid-transition date into two half-blocks (`n` and
//! `n.5`) so that rotations changing mid-block resolve correctly. Half-blocks
//! are the unit the off-service inference works in.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{EngineError, EngineResult};

/// Which half of a block a half-block covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlockHalf {
    First,
    Second,
}

/// Identifier for a half-block. Displays as `3` for the first half of block 3
/// and `3.5` for the second, matching the program's block-table convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId {
    pub block: u16,
    pub half: BlockHalf,
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.half {
            BlockHalf::First => write!(f, "{}", self.block),
            BlockHalf::Second => write!(f, "{}.5", self.block),
        }
    }
}

/// One row of the block boundary file.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockRow {
    pub block: u16,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub mid_transition_date: NaiveDate,
}

/// One half-block with an inclusive date span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HalfBlock {
    pub id: BlockId,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl HalfBlock {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days in the span, both endpoints inclusive.
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Validated lookup structure over the academic year's half-blocks.
#[derive(Debug, Clone)]
pub struct BlockTable {
    halves: Vec<HalfBlock>,
}

impl BlockTable {
    /// Build the table from block rows, splitting each block at its
    /// mid-transition date: the first half covers `[start, mid)`, the second
    /// `[mid, end]`. Both halves are stored with inclusive end dates.
    ///
    /// Fails if rows are not strictly increasing and contiguous, or if a
    /// mid-transition date falls outside its block.
    pub fn new(rows: &[BlockRow]) -> Result<Self> {
        if rows.is_empty() {
            bail!("block table is empty");
        }

        let mut halves = Vec::with_capacity(rows.len() * 2);
        let mut prev_end: Option<NaiveDate> = None;

        for row in rows {
            if row.start_date > row.end_date {
                bail!(
                    "block {} starts after it ends ({} > {})",
                    row.block,
                    row.start_date,
                    row.end_date
                );
            }
            if row.mid_transition_date <= row.start_date || row.mid_transition_date >= row.end_date {
                bail!(
                    "block {} mid-transition {} is outside ({}, {})",
                    row.block,
                    row.mid_transition_date,
                    row.start_date,
                    row.end_date
                );
            }
            if let Some(prev) = prev_end {
                let expected = prev
                    .succ_opt()
                    .context("block table extends past the calendar")?;
                if row.start_date != expected {
                    bail!(
                        "block {} starts {} but the previous block ends {}; blocks must be contiguous",
                        row.block,
                        row.start_date,
                        prev
                    );
                }
            }
            prev_end = Some(row.end_date);

            let first_half_end = row
                .mid_transition_date
                .pred_opt()
                .context("invalid mid-transition date")?;
            halves.push(HalfBlock {
                id: BlockId {
                    block: row.block,
                    half: BlockHalf::First,
                },
                start: row.start_date,
                end: first_half_end,
            });
            halves.push(HalfBlock {
                id: BlockId {
                    block: row.block,
                    half: BlockHalf::Second,
                },
                start: row.mid_transition_date,
                end: row.end_date,
            });
        }

        Ok(Self { halves })
    }

    /// First date covered by the table.
    pub fn first_date(&self) -> NaiveDate {
        self.halves[0].start
    }

    /// Last date covered by the table.
    pub fn last_date(&self) -> NaiveDate {
        self.halves[self.halves.len() - 1].end
    }

    pub fn halves(&self) -> &[HalfBlock] {
        &self.halves
    }

    /// The unique half-block containing `date`.
    pub fn block_for_date(&self, date: NaiveDate) -> EngineResult<&HalfBlock> {
        self.halves
            .iter()
            .find(|h| h.contains(date))
            .ok_or(EngineError::OutOfRange {
                date,
                first: self.first_date(),
                last: self.last_date(),
            })
    }

    /// Half-blocks whose spans intersect the inclusive date range.
    pub fn halves_intersecting(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Iterator<Item = &HalfBlock> {
        self.halves
            .iter()
            .filter(move |h| h.start <= end && start <= h.end)
    }

    /// The half-block-aligned span covering the inclusive date range. Shift
    /// counting needs the full span of every intersecting half-block, so
    /// fetches widen the requested range to this.
    pub fn covering_span(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<(NaiveDate, NaiveDate)> {
        let first = self.block_for_date(start)?;
        let last = self.block_for_date(end)?;
        Ok((first.start, last.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn two_block_table() -> BlockTable {
        BlockTable::new(&[
            BlockRow {
                block: 1,
                start_date: date(2023, 1, 1),
                end_date: date(2023, 1, 14),
                mid_transition_date: date(2023, 1, 8),
            },
            BlockRow {
                block: 2,
                start_date: date(2023, 1, 15),
                end_date: date(2023, 1, 28),
                mid_transition_date: date(2023, 1, 22),
            },
        ])
        .unwrap()
    }

    #[test]
    fn splits_blocks_at_mid_transition() {
        let table = two_block_table();
        let halves = table.halves();
        assert_eq!(halves.len(), 4);
        assert_eq!(halves[0].start, date(2023, 1, 1));
        assert_eq!(halves[0].end, date(2023, 1, 7));
        assert_eq!(halves[1].start, date(2023, 1, 8));
        assert_eq!(halves[1].end, date(2023, 1, 14));
        assert_eq!(halves[0].day_count(), 7);
        assert_eq!(halves[1].day_count(), 7);
    }

    #[test]
    fn block_for_date_picks_correct_half() {
        let table = two_block_table();
        assert_eq!(
            table.block_for_date(date(2023, 1, 7)).unwrap().id.to_string(),
            "1"
        );
        assert_eq!(
            table.block_for_date(date(2023, 1, 8)).unwrap().id.to_string(),
            "1.5"
        );
        assert_eq!(
            table.block_for_date(date(2023, 1, 28)).unwrap().id.to_string(),
            "2.5"
        );
    }

    #[test]
    fn out_of_range_dates_fail() {
        let table = two_block_table();
        assert!(matches!(
            table.block_for_date(date(2022, 12, 31)),
            Err(EngineError::OutOfRange { .. })
        ));
        assert!(matches!(
            table.block_for_date(date(2023, 1, 29)),
            Err(EngineError::OutOfRange { .. })
        ));
    }

    #[test]
    fn covering_span_widens_to_half_block_edges() {
        let table = two_block_table();
        let (start, end) = table.covering_span(date(2023, 1, 5), date(2023, 1, 20)).unwrap();
        assert_eq!(start, date(2023, 1, 1));
        assert_eq!(end, date(2023, 1, 21));
    }

    #[test]
    fn non_contiguous_blocks_rejected() {
        let err = BlockTable::new(&[
            BlockRow {
                block: 1,
                start_date: date(2023, 1, 1),
                end_date: date(2023, 1, 14),
                mid_transition_date: date(2023, 1, 8),
            },
            BlockRow {
                block: 2,
                start_date: date(2023, 1, 17),
                end_date: date(2023, 1, 28),
                mid_transition_date: date(2023, 1, 22),
            },
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn mid_transition_outside_block_rejected() {
        let row = |mid: NaiveDate| BlockRow {
            block: 1,
            start_date: date(2023, 1, 1),
            end_date: date(2023, 1, 14),
            mid_transition_date: mid,
        };
        // mid must fall strictly between the block's start and end
        assert!(BlockTable::new(&[row(date(2023, 1, 1))]).is_err());
        assert!(BlockTable::new(&[row(date(2023, 1, 14))]).is_err());
        assert!(BlockTable::new(&[row(date(2023, 1, 15))]).is_err());
        assert!(BlockTable::new(&[row(date(2023, 1, 13))]).is_ok());
    }

    #[test]
    fn empty_table_rejected() {
        assert!(BlockTable::new(&[]).is_err());
    }
}
