//! In-process calendar store that records every call.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};

use crate::error::{SheetCalError, SheetCalResult};
use crate::remote::{
    AccessRole, CalendarDirectoryService, CalendarEvent, CalendarListing, EventStore,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Create {
        calendar_id: String,
        title: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    Get(String),
    SetTitle(String, String),
    SetInterval(String, DateTime<Utc>, DateTime<Utc>),
    ListEvents(String),
}

impl Call {
    pub(crate) fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::Create { .. } | Call::SetTitle(..) | Call::SetInterval(..)
        )
    }
}

#[derive(Default)]
pub(crate) struct FakeCalendar {
    calendars: Vec<CalendarListing>,
    events: Mutex<HashMap<String, CalendarEvent>>,
    calls: Mutex<Vec<Call>>,
    list_calls: AtomicUsize,
    next_id: AtomicUsize,
    fail_list: bool,
    fail_create_on: Option<String>,
}

impl FakeCalendar {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_calendar(mut self, name: &str, id: &str, access_role: AccessRole) -> Self {
        self.calendars.push(CalendarListing {
            id: id.to_string(),
            name: name.to_string(),
            access_role,
        });
        self
    }

    pub(crate) fn with_event(self, event: CalendarEvent) -> Self {
        self.events
            .lock()
            .unwrap()
            .insert(event.id.clone(), event);
        self
    }

    pub(crate) fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    /// Make `create_event` fail for one calendar id.
    pub(crate) fn failing_create_on(mut self, calendar_id: &str) -> Self {
        self.fail_create_on = Some(calendar_id.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn event(&self, id: &str) -> Option<CalendarEvent> {
        self.events.lock().unwrap().get(id).cloned()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl CalendarDirectoryService for FakeCalendar {
    async fn list_calendars(&self, max_results: u32) -> SheetCalResult<Vec<CalendarListing>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list {
            return Err(SheetCalError::Provider("directory unavailable".into()));
        }
        Ok(self
            .calendars
            .iter()
            .take(max_results as usize)
            .cloned()
            .collect())
    }
}

impl EventStore for FakeCalendar {
    async fn create_event(
        &self,
        calendar_id: &str,
        title: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SheetCalResult<CalendarEvent> {
        self.record(Call::Create {
            calendar_id: calendar_id.to_string(),
            title: title.to_string(),
            start,
            end,
        });
        if self.fail_create_on.as_deref() == Some(calendar_id) {
            return Err(SheetCalError::Provider("quota exceeded".into()));
        }

        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let event = CalendarEvent {
            id: format!("evt-{n}"),
            calendar_id: calendar_id.to_string(),
            title: title.to_string(),
            start,
            end,
            recurring: false,
        };
        self.events
            .lock()
            .unwrap()
            .insert(event.id.clone(), event.clone());
        Ok(event)
    }

    async fn get_event(&self, event_id: &str) -> SheetCalResult<CalendarEvent> {
        self.record(Call::Get(event_id.to_string()));
        self.event(event_id)
            .ok_or_else(|| SheetCalError::EventNotFound(event_id.to_string()))
    }

    async fn set_title(&self, event_id: &str, title: &str) -> SheetCalResult<()> {
        self.record(Call::SetTitle(event_id.to_string(), title.to_string()));
        let mut events = self.events.lock().unwrap();
        let event = events
            .get_mut(event_id)
            .ok_or_else(|| SheetCalError::EventNotFound(event_id.to_string()))?;
        event.title = title.to_string();
        Ok(())
    }

    async fn set_interval(
        &self,
        event_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SheetCalResult<()> {
        self.record(Call::SetInterval(event_id.to_string(), start, end));
        let mut events = self.events.lock().unwrap();
        let event = events
            .get_mut(event_id)
            .ok_or_else(|| SheetCalError::EventNotFound(event_id.to_string()))?;
        event.start = start;
        event.end = end;
        Ok(())
    }

    async fn list_events(
        &self,
        calendar_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> SheetCalResult<Vec<CalendarEvent>> {
        self.record(Call::ListEvents(calendar_id.to_string()));
        Ok(self
            .events
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.calendar_id == calendar_id && e.end >= from && e.start <= to)
            .cloned()
            .collect())
    }
}
