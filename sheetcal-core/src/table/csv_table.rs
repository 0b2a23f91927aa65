use std::path::{Path, PathBuf};

use tracing::debug;

use crate::column::Column;
use crate::error::{SheetCalError, SheetCalResult};
use crate::rules::RuleSet;
use crate::table::{CellValue, InputConstraints, TabularStore};

/// A schedule table stored as a CSV file.
///
/// The whole file is read on open. Every `write_cell` rewrites the file
/// before returning, so an identifier written back is on disk even if the
/// run dies right after.
#[derive(Debug)]
pub struct CsvTable {
    path: PathBuf,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn open(path: &Path) -> SheetCalResult<Self> {
        if !path.exists() {
            return Err(SheetCalError::Table(format!(
                "Table file not found at {}",
                path.display()
            )));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        debug!(path = %path.display(), rows = rows.len(), "Loaded table");

        Ok(CsvTable {
            path: path.to_path_buf(),
            rows,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sidecar file holding input rules: `schedule.csv` → `schedule.rules.toml`.
    pub fn rules_path(&self) -> PathBuf {
        self.path.with_extension("rules.toml")
    }

    fn save(&self) -> SheetCalResult<()> {
        let tmp_path = self.path.with_extension("csv.tmp");
        {
            let mut writer = csv::WriterBuilder::new()
                .flexible(true)
                .from_path(&tmp_path)?;
            for row in &self.rows {
                writer.write_record(row)?;
            }
            writer.flush()?;
        }
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn cell(&self, row: usize, column: Column) -> CellValue {
        row.checked_sub(1)
            .and_then(|r| self.rows.get(r))
            .and_then(|cells| cells.get(column.index()))
            .map(|text| CellValue::from_text(text))
            .unwrap_or(CellValue::Empty)
    }
}

impl TabularStore for CsvTable {
    fn header_row(&self) -> SheetCalResult<Vec<String>> {
        Ok(self
            .rows
            .first()
            .map(|cells| cells.iter().map(|c| c.trim().to_string()).collect())
            .unwrap_or_default())
    }

    fn last_occupied_row(&self) -> SheetCalResult<usize> {
        Ok(self
            .rows
            .iter()
            .rposition(|cells| cells.iter().any(|c| !c.trim().is_empty()))
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
            cells.resize(column.index() + 1, String::new());
        }
        cells[column.index()] = value.to_string();
        self.save()
    }
}

impl InputConstraints for CsvTable {
    fn set_allowed_values(
        &mut self,
        column: Column,
        first_row: usize,
        values: &[String],
    ) -> SheetCalResult<()> {
        let path = self.rules_path();
        let mut rules = RuleSet::load(&path)?;
        rules.set_allowed_values(column, first_row, values)?;
        rules.save(&path)
    }

    fn set_date_only(&mut self, from: Column, to: Column, first_row: usize) -> SheetCalResult<()> {
        let path = self.rules_path();
        let mut rules = RuleSet::load(&path)?;
        rules.set_date_only(from, to, first_row)?;
        rules.save(&path)
    }
}
