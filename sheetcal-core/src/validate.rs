//! Record eligibility.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::record::ScheduleRecord;

/// Title, calendar, start and end are present and non-empty (the event id
/// is not required), and the record has not ended before `now`.
pub fn is_eligible(record: &ScheduleRecord, now: DateTime<Utc>) -> bool {
    if record.title.is_empty() || record.calendar_name.is_empty() {
        return false;
    }
    match (record.start, record.end) {
        (Some(_), Some(end)) => end >= now,
        _ => false,
    }
}

/// Drop ineligible records. Dropping is silent apart from a debug log.
pub fn filter_eligible(records: Vec<ScheduleRecord>, now: DateTime<Utc>) -> Vec<ScheduleRecord> {
    records
        .into_iter()
        .filter(|record| {
            let eligible = is_eligible(record, now);
            if !eligible {
                debug!(row = record.row, "Skipping incomplete or past row");
            }
            eligible
        })
        .collect()
}
