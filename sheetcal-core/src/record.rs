//! Typed schedule records read from the table.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::debug;

use crate::column::{ColumnMapping, Field};
use crate::error::SheetCalResult;
use crate::table::{CellValue, TabularStore};

/// One row's desired event state.
///
/// Built fresh on every run. `event_id` is the only field ever written back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleRecord {
    /// 1-based table row, counting header rows.
    pub row: usize,
    pub title: String,
    pub calendar_name: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub event_id: Option<String>,
}

impl ScheduleRecord {
    pub fn is_registered(&self) -> bool {
        self.event_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

/// How records are laid out in the table for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableLayout {
    pub mapping: ColumnMapping,
    pub header_rows: usize,
    pub timezone: Tz,
}

impl TableLayout {
    pub fn first_data_row(&self) -> usize {
        self.header_rows + 1
    }
}

/// Last row whose title cell is non-empty, scanning up from the last
/// occupied row. `None` when no data row has a title.
pub fn last_record_row<S: TabularStore>(
    store: &S,
    layout: &TableLayout,
) -> SheetCalResult<Option<usize>> {
    let first = layout.first_data_row();
    let last = store.last_occupied_row()?;
    if last < first {
        return Ok(None);
    }

    let titles = store.read_range(first, last, layout.mapping.title)?;
    Ok(titles
        .iter()
        .rposition(|cell| !cell.is_empty())
        .map(|offset| first + offset))
}

/// Read every data row up to the last titled row into records.
pub fn extract_records<S: TabularStore>(
    store: &S,
    layout: &TableLayout,
) -> SheetCalResult<Vec<ScheduleRecord>> {
    let Some(last) = last_record_row(store, layout)? else {
        debug!("No titled rows in table");
        return Ok(Vec::new());
    };
    let first = layout.first_data_row();

    let read = |field: Field| store.read_range(first, last, layout.mapping.get(field));
    let titles = read(Field::Title)?;
    let calendars = read(Field::Calendar)?;
    let starts = read(Field::Start)?;
    let ends = read(Field::End)?;
    let event_ids = read(Field::EventId)?;

    let records = titles
        .into_iter()
        .zip(calendars)
        .zip(starts)
        .zip(ends)
        .zip(event_ids)
        .enumerate()
        .map(|(offset, ((((title, calendar), start), end), event_id))| {
            let row = first + offset;
            ScheduleRecord {
                row,
                title: title.as_text().unwrap_or_default(),
                calendar_name: calendar.as_text().unwrap_or_default(),
                start: read_time(&start, layout.timezone, row, Field::Start),
                end: read_time(&end, layout.timezone, row, Field::End),
                event_id: event_id.as_text(),
            }
        })
        .collect();

    Ok(records)
}

fn read_time(cell: &CellValue, tz: Tz, row: usize, field: Field) -> Option<DateTime<Utc>> {
    let parsed = cell.to_datetime(tz);
    if parsed.is_none() && !cell.is_empty() {
        debug!(row, field = field.name(), ?cell, "Unreadable date cell");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::table::MemoryTable;
    use chrono::{NaiveDate, TimeZone};

    fn text(s: &str) -> CellValue {
        CellValue::from_text(s)
    }

    fn layout() -> TableLayout {
        TableLayout {
            mapping: ColumnMapping::default(),
            header_rows: 1,
            timezone: Tz::UTC,
        }
    }

    fn header() -> Vec<CellValue> {
        ["Title", "Calendar", "Start", "End", "Event ID"]
            .iter()
            .map(|s| text(s))
            .collect()
    }

    #[test]
    fn test_extract_zips_columns_by_row() {
        let native = NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let table = MemoryTable::from_rows(vec![
            header(),
            vec![
                text("Standup"),
                text("Work"),
                text("2024-01-10 09:00"),
                text("2024-01-10 09:30"),
                CellValue::Empty,
            ],
            vec![
                text("Review"),
                text("Work"),
                text("2024-01-10 09:30"),
                CellValue::DateTime(native),
                text("evt-9"),
            ],
        ]);

        let records = extract_records(&table, &layout()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].row, 2);
        assert_eq!(records[0].title, "Standup");
        assert_eq!(
            records[0].start,
            Some(Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap())
        );
        assert!(!records[0].is_registered());
        assert_eq!(records[1].row, 3);
        assert_eq!(records[1].end, Some(native.and_utc()));
        assert_eq!(records[1].event_id.as_deref(), Some("evt-9"));
        assert!(records[1].is_registered());
    }

    #[test]
    fn test_rows_after_last_title_are_ignored() {
        let table = MemoryTable::from_rows(vec![
            header(),
            vec![text("Standup"), text("Work")],
            vec![CellValue::Empty, text("Work"), text("2024-01-10")],
            vec![CellValue::Empty, CellValue::Empty, CellValue::Empty, text("2024-01-11")],
        ]);

        assert_eq!(last_record_row(&table, &layout()).unwrap(), Some(2));
        assert_eq!(extract_records(&table, &layout()).unwrap().len(), 1);
    }

    #[test]
    fn test_untitled_gap_rows_are_still_extracted() {
        let table = MemoryTable::from_rows(vec![
            header(),
            vec![text("A")],
            vec![CellValue::Empty, text("Work")],
            vec![text("C")],
        ]);

        let records = extract_records(&table, &layout()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].title, "");
        assert_eq!(records[1].calendar_name, "Work");
    }

    #[test]
    fn test_header_only_table_has_no_records() {
        let table = MemoryTable::from_rows(vec![header()]);
        assert_eq!(last_record_row(&table, &layout()).unwrap(), None);
        assert!(extract_records(&table, &layout()).unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_dates_become_none() {
        let table = MemoryTable::from_rows(vec![
            header(),
            vec![text("Standup"), text("Work"), text("someday"), text("2024-01-10")],
        ]);
        let records = extract_records(&table, &layout()).unwrap();
        assert_eq!(records[0].start, None);
        assert!(records[0].end.is_some());
    }

    #[test]
    fn test_uses_resolved_mapping() {
        let mapping = ColumnMapping {
            title: Column::from_index(2),
            calendar: Column::from_index(0),
            start: Column::from_index(3),
            end: Column::from_index(4),
            event_id: Column::from_index(1),
        };
        let table = MemoryTable::from_rows(vec![
            header(),
            vec![text("Work"), text("evt-1"), text("Standup")],
        ]);
        let layout = TableLayout {
            mapping,
            ..layout()
        };

        let records = extract_records(&table, &layout).unwrap();
        assert_eq!(records[0].title, "Standup");
        assert_eq!(records[0].calendar_name, "Work");
        assert_eq!(records[0].event_id.as_deref(), Some("evt-1"));
    }
}
