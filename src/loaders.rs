//! Roster and block-boundary file loading.
//!
//! Both files are small reference tables loaded once at startup: the
//! resident roster (name parts and postgraduate year) and the academic-year
//! block boundary table.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use crate::models::{BlockRow, BlockTable, Resident, Roster};

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "firstName")]
    first_name: String,
    #[serde(rename = "lastName")]
    last_name: String,
    pgy: u8,
}

impl RosterRow {
    fn into_resident(self) -> Resident {
        let id = match self.first_name.chars().next() {
            Some(initial) => format!("{} {}", initial, self.last_name),
            None => self.last_name.clone(),
        };
        Resident {
            id,
            display_name: format!("{} {}", self.first_name, self.last_name),
            class_year: self.pgy,
        }
    }
}

/// Parse the roster from CSV with `firstName,lastName,pgy` columns.
pub fn parse_roster<R: Read>(reader: R) -> Result<Roster> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut residents = Vec::new();
    for row in csv_reader.deserialize::<RosterRow>() {
        let row = row.context("invalid roster row")?;
        residents.push(row.into_resident());
    }
    Ok(Roster::new(residents))
}

/// Load the roster from a CSV file.
pub fn load_roster(path: impl AsRef<Path>) -> Result<Roster> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open roster file {}", path.display()))?;
    parse_roster(file)
}

#[derive(Debug, Deserialize)]
struct BlockFileRow {
    block: u16,
    start_date: NaiveDate,
    end_date: NaiveDate,
    mid_transition_date: NaiveDate,
}

/// Parse the block boundary table from CSV with
/// `block,start_date,end_date,mid_transition_date` columns (ISO dates).
pub fn parse_block_table<R: Read>(reader: R) -> Result<BlockTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for row in csv_reader.deserialize::<BlockFileRow>() {
        let row = row.context("invalid block table row")?;
        rows.push(BlockRow {
            block: row.block,
            start_date: row.start_date,
            end_date: row.end_date,
            mid_transition_date: row.mid_transition_date,
        });
    }
    BlockTable::new(&rows).context("invalid block table")
}

/// Load the block boundary table from a CSV file.
pub fn load_block_table(path: impl AsRef<Path>) -> Result<BlockTable> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open block table file {}", path.display()))?;
    parse_block_table(file)
}
