//! Input constraints for the data-entry surface.
//!
//! The calendar column only accepts names of calendars the user owns, and the
//! start..end span only accepts dates. Surfaces that cannot enforce rules
//! themselves (a CSV file) can still report cells that break them.

use std::fmt;
use std::path::Path;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::column::{Column, ColumnMapping};
use crate::error::{SheetCalError, SheetCalResult};
use crate::table::{InputConstraints, TabularStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedValuesRule {
    pub column: Column,
    pub first_row: usize,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOnlyRule {
    pub from: Column,
    pub to: Column,
    pub first_row: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<AllowedValuesRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub date_only: Vec<DateOnlyRule>,
}

impl InputConstraints for RuleSet {
    fn set_allowed_values(
        &mut self,
        column: Column,
        first_row: usize,
        values: &[String],
    ) -> SheetCalResult<()> {
        self.allowed_values.retain(|rule| rule.column != column);
        self.allowed_values.push(AllowedValuesRule {
            column,
            first_row,
            values: values.to_vec(),
        });
        Ok(())
    }

    fn set_date_only(&mut self, from: Column, to: Column, first_row: usize) -> SheetCalResult<()> {
        self.date_only
            .retain(|rule| !(rule.from == from && rule.to == to));
        self.date_only.push(DateOnlyRule {
            from,
            to,
            first_row,
        });
        Ok(())
    }
}

impl RuleSet {
    /// Rules for a schedule table laid out by `mapping`.
    pub fn for_mapping(mapping: &ColumnMapping, calendar_names: &[String], first_row: usize) -> Self {
        let (from, to) = if mapping.start <= mapping.end {
            (mapping.start, mapping.end)
        } else {
            (mapping.end, mapping.start)
        };

        RuleSet {
            allowed_values: vec![AllowedValuesRule {
                column: mapping.calendar,
                first_row,
                values: calendar_names.to_vec(),
            }],
            date_only: vec![DateOnlyRule {
                from,
                to,
                first_row,
            }],
        }
    }

    pub fn apply<C: InputConstraints>(&self, surface: &mut C) -> SheetCalResult<()> {
        for rule in &self.allowed_values {
            surface.set_allowed_values(rule.column, rule.first_row, &rule.values)?;
        }
        for rule in &self.date_only {
            surface.set_date_only(rule.from, rule.to, rule.first_row)?;
        }
        Ok(())
    }

    pub fn load(path: &Path) -> SheetCalResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| SheetCalError::Serialization(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> SheetCalResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| SheetCalError::Serialization(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Cells in `store` that break a rule, ordered by row then column.
    pub fn violations<S: TabularStore>(&self, store: &S, tz: Tz) -> SheetCalResult<Vec<Violation>> {
        let last_row = store.last_occupied_row()?;
        let mut violations = Vec::new();

        for rule in &self.allowed_values {
            if last_row < rule.first_row {
                continue;
            }
            let cells = store.read_range(rule.first_row, last_row, rule.column)?;
            for (offset, cell) in cells.iter().enumerate() {
                let Some(value) = cell.as_text() else {
                    continue;
                };
                if !rule.values.contains(&value) {
                    violations.push(Violation {
                        row: rule.first_row + offset,
                        column: rule.column,
                        value,
                        kind: ViolationKind::NotInList,
                    });
                }
            }
        }

        for rule in &self.date_only {
            if last_row < rule.first_row {
                continue;
            }
            for index in rule.from.index()..=rule.to.index() {
                let column = Column::from_index(index);
                let cells = store.read_range(rule.first_row, last_row, column)?;
                for (offset, cell) in cells.iter().enumerate() {
                    if cell.is_empty() || cell.to_datetime(tz).is_some() {
                        continue;
                    }
                    violations.push(Violation {
                        row: rule.first_row + offset,
                        column,
                        value: cell.as_text().unwrap_or_default(),
                        kind: ViolationKind::NotADate,
                    });
                }
            }
        }

        violations.sort_by_key(|v| (v.row, v.column));
        Ok(violations)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    NotInList,
    NotADate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub row: usize,
    pub column: Column,
    pub value: String,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let problem = match self.kind {
            ViolationKind::NotInList => "is not an owned calendar",
            ViolationKind::NotADate => "is not a date",
        };
        write!(f, "{}{}: '{}' {}", self.column, self.row, self.value, problem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{CellValue, MemoryTable};

    fn text(s: &str) -> CellValue {
        CellValue::from_text(s)
    }

    #[test]
    fn test_for_mapping_orders_date_span() {
        let mapping = ColumnMapping {
            start: Column::from_index(6),
            end: Column::from_index(3),
            ..ColumnMapping::default()
        };
        let rules = RuleSet::for_mapping(&mapping, &["Work".to_string()], 2);

        assert_eq!(rules.date_only[0].from, Column::from_index(3));
        assert_eq!(rules.date_only[0].to, Column::from_index(6));
        assert_eq!(rules.allowed_values[0].column, mapping.calendar);
    }

    #[test]
    fn test_setting_a_rule_twice_replaces_it() {
        let mut rules = RuleSet::default();
        let column = Column::from_index(1);
        rules
            .set_allowed_values(column, 2, &["Old".to_string()])
            .unwrap();
        rules
            .set_allowed_values(column, 2, &["New".to_string()])
            .unwrap();

        assert_eq!(rules.allowed_values.len(), 1);
        assert_eq!(rules.allowed_values[0].values, vec!["New".to_string()]);
    }

    #[test]
    fn test_violations_flag_unknown_calendars_and_bad_dates() {
        let table = MemoryTable::from_rows(vec![
            vec![text("Title"), text("Calendar"), text("Start"), text("End")],
            vec![text("A"), text("Work"), text("2024-01-10 09:00"), text("2024-01-10 10:00")],
            vec![text("B"), text("Gym"), text("soon"), text("2024-01-10 10:00")],
            vec![text("C"), CellValue::Empty, CellValue::Empty, text("later")],
        ]);
        let rules = RuleSet::for_mapping(&ColumnMapping::default(), &["Work".to_string()], 2);

        let violations = rules.violations(&table, Tz::UTC).unwrap();

        assert_eq!(violations.len(), 3);
        assert_eq!(violations[0].to_string(), "B3: 'Gym' is not an owned calendar");
        assert_eq!(violations[1].to_string(), "C3: 'soon' is not a date");
        assert_eq!(violations[2].to_string(), "D4: 'later' is not a date");
    }

    #[test]
    fn test_save_and_load_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        let rules = RuleSet::for_mapping(&ColumnMapping::default(), &["Work".to_string()], 2);

        rules.save(&path).unwrap();
        assert_eq!(RuleSet::load(&path).unwrap(), rules);
    }

    #[test]
    fn test_load_missing_sidecar_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(RuleSet::load(&dir.path().join("none.toml")).unwrap(), RuleSet::default());
    }
}
