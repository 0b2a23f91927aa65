use crate::column::Column;
use crate::error::{SheetCalError, SheetCalResult};
use crate::rules::RuleSet;
use crate::table::{CellValue, InputConstraints, TabularStore};

/// A table held entirely in memory. Records every write.
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    rows: Vec<Vec<CellValue>>,
    writes: Vec<(usize, Column, String)>,
    rules: RuleSet,
}

impl MemoryTable {
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        MemoryTable {
            rows,
            ..Default::default()
        }
    }

    pub fn cell(&self, row: usize, column: Column) -> CellValue {
        row.checked_sub(1)
            .and_then(|r| self.rows.get(r))
            .and_then(|cells| cells.get(column.index()))
            .cloned()
            .unwrap_or(CellValue::Empty)
    }

    /// Every `write_cell` call so far, in order.
    pub fn writes(&self) -> &[(usize, Column, String)] {
        &self.writes
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

impl TabularStore for MemoryTable {
    fn header_row(&self) -> SheetCalResult<Vec<String>> {
        Ok(self
            .rows
            .first()
            .map(|cells| {
                cells
                    .iter()
                    .map(|c| c.as_text().unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default())
    }

    fn last_occupied_row(&self) -> SheetCalResult<usize> {
        Ok(self
            .rows
            .iter()
            .rposition(|cells| cells.iter().any(|c| !c.is_empty()))
            .map_or(0, |i| i + 1))
    }

    fn read_range(
        &self,
        start_row: usize,
        end_row: usize,
        column: Column,
    ) -> SheetCalResult<Vec<CellValue>> {
        if start_row == 0 {
            return Err(SheetCalError::Table("rows are 1-based".into()));
        }
        Ok((start_row..=end_row)
            .map(|row| self.cell(row, column))
            .collect())
    }

    fn write_cell(&mut self, row: usize, column: Column, value: &str) -> SheetCalResult<()> {
        if row == 0 {
            return Err(SheetCalError::Table("rows are 1-based".into()));
        }
        if self.rows.len() < row {
            self.rows.resize(row, Vec::new());
        }
        let cells = &mut self.rows[row - 1];
        if cells.len() <= column.index() {
            cells.resize(column.index() + 1, CellValue::Empty);
        }
        cells[column.index()] = CellValue::from_text(value);
        self.writes.push((row, column, value.to_string()));
        Ok(())
    }
}

impl InputConstraints for MemoryTable {
    fn set_allowed_values(
        &mut self,
        column: Column,
        first_row: usize,
        values: &[String],
    ) -> SheetCalResult<()> {
        self.rules.set_allowed_values(column, first_row, values)
    }

    fn set_date_only(&mut self, from: Column, to: Column, first_row: usize) -> SheetCalResult<()> {
        self.rules.set_date_only(from, to, first_row)
    }
}
