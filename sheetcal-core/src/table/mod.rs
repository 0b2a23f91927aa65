//! The tabular source of schedule rows.
//!
//! Rows are 1-based and include the header rows, so row 1 is the header and
//! the first record usually sits in row 2.

mod csv_table;
mod memory;

pub use csv_table::CsvTable;
pub use memory::MemoryTable;

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::column::Column;
use crate::error::SheetCalResult;
use crate::time;

/// One cell as read from the table.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    /// A native date value. Holds wall-clock time, like a spreadsheet does.
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Whitespace-only text counts as empty.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }

    pub fn to_datetime(&self, tz: Tz) -> Option<DateTime<Utc>> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => time::parse_datetime(s, tz),
            CellValue::DateTime(naive) => time::localize(*naive, tz),
        }
    }
}

/// Read/write access to the table holding schedule rows.
pub trait TabularStore {
    /// Cell text of row 1.
    fn header_row(&self) -> SheetCalResult<Vec<String>>;

    /// Last row with any non-empty cell, or 0 for an empty table.
    fn last_occupied_row(&self) -> SheetCalResult<usize>;

    /// Cells of one column from `start_row` to `end_row` inclusive. Rows
    /// past the end of the table read as empty.
    fn read_range(
        &self,
        start_row: usize,
        end_row: usize,
        column: Column,
    ) -> SheetCalResult<Vec<CellValue>>;

    fn write_cell(&mut self, row: usize, column: Column, value: &str) -> SheetCalResult<()>;
}

/// A data-entry surface that can restrict what users type into cells.
pub trait InputConstraints {
    /// Only `values` are accepted in `column` from `first_row` down.
    /// Replaces any earlier list rule on the same column.
    fn set_allowed_values(
        &mut self,
        column: Column,
        first_row: usize,
        values: &[String],
    ) -> SheetCalResult<()>;

    /// Only date/time values are accepted in columns `from..=to` from
    /// `first_row` down.
    fn set_date_only(&mut self, from: Column, to: Column, first_row: usize) -> SheetCalResult<()>;
}
