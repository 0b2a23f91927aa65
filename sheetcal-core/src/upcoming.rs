//! Upcoming events across every owned calendar.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::debug;

use crate::constants::DEFAULT_UPCOMING_DAYS;
use crate::directory::CalendarDirectory;
use crate::error::{SheetCalError, SheetCalResult};
use crate::remote::{CalendarDirectoryService, CalendarEvent, EventStore};
use crate::time::localize;

/// Date range for listing events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    /// `now` to `now + DEFAULT_UPCOMING_DAYS`.
    pub fn from_now(now: DateTime<Utc>) -> Self {
        DateRange {
            from: now,
            to: now + Duration::days(DEFAULT_UPCOMING_DAYS),
        }
    }

    /// Parse YYYY-MM-DD bounds as days in `tz`. `from` starts its day, `to`
    /// ends its day; missing bounds fall back to [`DateRange::from_now`].
    pub fn from_args(
        from: Option<&str>,
        to: Option<&str>,
        now: DateTime<Utc>,
        tz: Tz,
    ) -> SheetCalResult<Self> {
        let default = Self::from_now(now);

        let from = match from {
            Some(s) => day_bound(s, 0, 0, 0, tz)?,
            None => default.from,
        };
        let to = match to {
            Some(s) => day_bound(s, 23, 59, 59, tz)?,
            None => default.to,
        };

        if from > to {
            return Err(SheetCalError::Config(
                "Date range must start before it ends".into(),
            ));
        }
        Ok(DateRange { from, to })
    }
}

fn day_bound(s: &str, h: u32, m: u32, sec: u32, tz: Tz) -> SheetCalResult<DateTime<Utc>> {
    parse_date(s)?
        .and_hms_opt(h, m, sec)
        .and_then(|naive| localize(naive, tz))
        .ok_or_else(|| SheetCalError::Config(format!("'{s}' has no such time in {tz}")))
}

fn parse_date(s: &str) -> SheetCalResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| SheetCalError::Config(format!("Invalid date '{s}'. Expected YYYY-MM-DD")))
}

/// An event together with the name of the calendar it lives on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingEvent {
    pub calendar: String,
    #[serde(flatten)]
    pub event: CalendarEvent,
}

/// Non-recurring events on owned calendars inside `range`, sorted by start.
pub async fn upcoming_events<D, E>(
    directory: &CalendarDirectory<'_, D>,
    store: &E,
    range: DateRange,
) -> SheetCalResult<Vec<UpcomingEvent>>
where
    D: CalendarDirectoryService,
    E: EventStore,
{
    let mut upcoming = Vec::new();

    for calendar in directory.list().await? {
        let events = store.list_events(&calendar.id, range.from, range.to).await?;
        let before = events.len();
        upcoming.extend(
            events
                .into_iter()
                .filter(|e| !e.recurring)
                .map(|event| UpcomingEvent {
                    calendar: calendar.name.clone(),
                    event,
                }),
        );
        debug!(calendar = %calendar.name, listed = before, "Listed events");
    }

    upcoming.sort_by(|a, b| a.event.start.cmp(&b.event.start));
    Ok(upcoming)
}
