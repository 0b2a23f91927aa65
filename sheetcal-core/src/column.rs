//! Column mapping between logical schedule fields and physical table columns.
//!
//! The mapping is a plain value: it is either the configured defaults or a
//! set resolved in full from the header row. A header that only matches some
//! labels never produces a mixed mapping.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SheetCalError, SheetCalResult};

/// A physical table column. Stored 0-based, displayed as spreadsheet
/// letters ("A", "B", ..., "Z", "AA").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Column(usize);

impl Column {
    pub const fn from_index(index: usize) -> Self {
        Column(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }

    pub fn letters(self) -> String {
        let mut n = self.0 + 1;
        let mut letters = Vec::new();
        while n > 0 {
            n -= 1;
            letters.push((b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        letters.iter().rev().collect()
    }
}

impl FromStr for Column {
    type Err = SheetCalError;

    fn from_str(s: &str) -> SheetCalResult<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SheetCalError::InvalidColumn(s.to_string()));
        }

        let mut n: usize = 0;
        for c in trimmed.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(SheetCalError::InvalidColumn(s.to_string()));
            }
            let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
            n = n
                .checked_mul(26)
                .and_then(|n| n.checked_add(digit))
                .ok_or_else(|| SheetCalError::InvalidColumn(s.to_string()))?;
        }

        Ok(Column(n - 1))
    }
}

impl TryFrom<String> for Column {
    type Error = SheetCalError;

    fn try_from(value: String) -> SheetCalResult<Self> {
        value.parse()
    }
}

impl From<Column> for String {
    fn from(column: Column) -> Self {
        column.letters()
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letters())
    }
}

/// The logical fields of a schedule row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Calendar,
    Start,
    End,
    EventId,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Title,
        Field::Calendar,
        Field::Start,
        Field::End,
        Field::EventId,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Calendar => "calendar",
            Field::Start => "start",
            Field::End => "end",
            Field::EventId => "event_id",
        }
    }
}

/// Where each logical field lives in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub title: Column,
    pub calendar: Column,
    pub start: Column,
    pub end: Column,
    pub event_id: Column,
}

impl Default for ColumnMapping {
    /// Title, calendar, start, end, event id in columns A to E.
    fn default() -> Self {
        ColumnMapping {
            title: Column(0),
            calendar: Column(1),
            start: Column(2),
            end: Column(3),
            event_id: Column(4),
        }
    }
}

impl ColumnMapping {
    pub fn get(&self, field: Field) -> Column {
        match field {
            Field::Title => self.title,
            Field::Calendar => self.calendar,
            Field::Start => self.start,
            Field::End => self.end,
            Field::EventId => self.event_id,
        }
    }

    /// The first two fields that share a column, if any.
    pub fn shared_column(&self) -> Option<(Field, Field)> {
        Field::ALL.iter().enumerate().find_map(|(i, a)| {
            Field::ALL[i + 1..]
                .iter()
                .find(|b| self.get(*a) == self.get(**b))
                .map(|b| (*a, *b))
        })
    }
}

/// Header labels that identify each field's column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderLabels {
    pub title: String,
    pub calendar: String,
    pub start: String,
    pub end: String,
    pub event_id: String,
}

impl Default for HeaderLabels {
    fn default() -> Self {
        HeaderLabels {
            title: "Title".to_string(),
            calendar: "Calendar".to_string(),
            start: "Start".to_string(),
            end: "End".to_string(),
            event_id: "Event ID".to_string(),
        }
    }
}

impl HeaderLabels {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Calendar => &self.calendar,
            Field::Start => &self.start,
            Field::End => &self.end,
            Field::EventId => &self.event_id,
        }
    }
}

/// Resolve every field from a header row, or nothing at all.
///
/// Labels match cell text exactly; the first matching cell wins. A header
/// where two fields land on the same column does not resolve.
pub fn resolve_header(header: &[String], labels: &HeaderLabels) -> Option<ColumnMapping> {
    let find = |field: Field| {
        let label = labels.get(field);
        header
            .iter()
            .position(|cell| cell == label)
            .map(Column::from_index)
    };

    let mapping = ColumnMapping {
        title: find(Field::Title)?,
        calendar: find(Field::Calendar)?,
        start: find(Field::Start)?,
        end: find(Field::End)?,
        event_id: find(Field::EventId)?,
    };

    match mapping.shared_column() {
        Some((a, b)) => {
            debug!(a = a.name(), b = b.name(), "Header labels share a column");
            None
        }
        None => Some(mapping),
    }
}

/// Holds the active mapping and swaps it wholesale when a header resolves.
#[derive(Debug, Clone)]
pub struct ColumnResolver {
    labels: HeaderLabels,
    active: ColumnMapping,
}

impl ColumnResolver {
    pub fn new(labels: HeaderLabels, defaults: ColumnMapping) -> Self {
        ColumnResolver {
            labels,
            active: defaults,
        }
    }

    pub fn mapping(&self) -> ColumnMapping {
        self.active
    }

    /// Returns true when the header replaced the active mapping.
    pub fn resolve(&mut self, header: &[String]) -> bool {
        match resolve_header(header, &self.labels) {
            Some(mapping) => {
                debug!(?mapping, "Resolved columns from header row");
                self.active = mapping;
                true
            }
            None => {
                let missing: Vec<&str> = Field::ALL
                    .iter()
                    .map(|f| self.labels.get(*f))
                    .filter(|label| !header.iter().any(|cell| cell == label))
                    .collect();
                debug!(?missing, "Header row incomplete, keeping current columns");
                false
            }
        }
    }
}
