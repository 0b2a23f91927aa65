//! A full run over a CSV table, through the public API only.

use std::cell::RefCell;

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use sheetcal_core::column::{ColumnMapping, HeaderLabels};
use sheetcal_core::directory::CalendarDirectory;
use sheetcal_core::reconcile::{RecordOutcome, Reconciler, SkipReason};
use sheetcal_core::remote::{
    AccessRole, CalendarDirectoryService, CalendarEvent, CalendarListing, EventStore,
};
use sheetcal_core::rules::RuleSet;
use sheetcal_core::table::{CsvTable, TabularStore};
use sheetcal_core::{SheetCalError, SheetCalResult};

#[derive(Default)]
struct InMemoryCalendar {
    events: RefCell<Vec<CalendarEvent>>,
    mutations: RefCell<usize>,
}

impl CalendarDirectoryService for InMemoryCalendar {
    async fn list_calendars(&self, _max_results: u32) -> SheetCalResult<Vec<CalendarListing>> {
        Ok(vec![
            CalendarListing {
                id: "cal-work".into(),
                name: "Work".into(),
                access_role: AccessRole::Owner,
            },
            CalendarListing {
                id: "cal-team".into(),
                name: "Team".into(),
                access_role: AccessRole::Writer,
            },
        ])
    }
}

impl EventStore for InMemoryCalendar {
    async fn create_event(
        &self,
        calendar_id: &str,
        title: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SheetCalResult<CalendarEvent> {
        *self.mutations.borrow_mut() += 1;
        let event = CalendarEvent {
            id: format!("id-{}", self.events.borrow().len() + 1),
            calendar_id: calendar_id.into(),
            title: title.into(),
            start,
            end,
            recurring: false,
        };
        self.events.borrow_mut().push(event.clone());
        Ok(event)
    }

    async fn get_event(&self, event_id: &str) -> SheetCalResult<CalendarEvent> {
        self.events
            .borrow()
            .iter()
            .find(|e| e.id == event_id)
            .cloned()
            .ok_or_else(|| SheetCalError::EventNotFound(event_id.into()))
    }

    async fn set_title(&self, event_id: &str, title: &str) -> SheetCalResult<()> {
        *self.mutations.borrow_mut() += 1;
        let mut events = self.events.borrow_mut();
        let event = events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| SheetCalError::EventNotFound(event_id.into()))?;
        event.title = title.into();
        Ok(())
    }

    async fn set_interval(
        &self,
        event_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SheetCalResult<()> {
        *self.mutations.borrow_mut() += 1;
        let mut events = self.events.borrow_mut();
        let event = events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| SheetCalError::EventNotFound(event_id.into()))?;
        event.start = start;
        event.end = end;
        Ok(())
    }

    async fn list_events(
        &self,
        calendar_id: &str,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> SheetCalResult<Vec<CalendarEvent>> {
        Ok(self
            .events
            .borrow()
            .iter()
            .filter(|e| e.calendar_id == calendar_id)
            .cloned()
            .collect())
    }
}

fn reconciler() -> Reconciler {
    Reconciler::new(
        HeaderLabels::default(),
        ColumnMapping::default(),
        1,
        chrono_tz::Europe::Berlin,
    )
}

#[tokio::test]
async fn test_csv_schedule_reaches_calendar_and_settles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schedule.csv");
    std::fs::write(
        &path,
        "Calendar,Title,Start,End,Event ID\n\
         Work,Standup,2024-01-10 09:00,2024-01-10 09:30,\n\
         Team,Retro,2024-01-10 15:00,2024-01-10 16:00,\n\
         Work,Planning,2024-01-11,2024-01-12,\n",
    )
    .unwrap();
    let now = Utc.with_ymd_and_hms(2024, 1, 10, 6, 0, 0).unwrap();
    let calendar = InMemoryCalendar::default();

    let mut table = CsvTable::open(&path).unwrap();
    let directory = CalendarDirectory::new(&calendar);
    let report = reconciler()
        .run(&mut table, &directory, &calendar, now)
        .await
        .unwrap();

    let counts = report.counts();
    assert_eq!(counts.created, 2);
    assert_eq!(counts.skipped, 1);
    assert_eq!(
        report.outcome_for_row(3),
        Some(&RecordOutcome::Skipped {
            reason: SkipReason::CalendarNotFound("Team".into())
        })
    );

    // Berlin is UTC+1 in January.
    let standup = calendar.get_event("id-1").await.unwrap();
    assert_eq!(standup.start, Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap());
    assert_eq!(standup.calendar_id, "cal-work");

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("Standup,2024-01-10 09:00,2024-01-10 09:30,id-1"));
    assert!(written.contains("Planning,2024-01-11,2024-01-12,id-2"));

    // Rename a row in the file and run again.
    std::fs::write(&path, written.replace("Standup", "Daily")).unwrap();
    let mutations_before = *calendar.mutations.borrow();

    let mut table = CsvTable::open(&path).unwrap();
    let directory = CalendarDirectory::new(&calendar);
    let report = reconciler()
        .run(&mut table, &directory, &calendar, now)
        .await
        .unwrap();

    assert_eq!(*calendar.mutations.borrow(), mutations_before + 1);
    assert_eq!(report.counts().updated, 1);
    assert_eq!(report.counts().unchanged, 1);
    assert_eq!(calendar.get_event("id-1").await.unwrap().title, "Daily");
}

#[tokio::test]
async fn test_rules_flag_unknown_calendars_in_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schedule.csv");
    std::fs::write(
        &path,
        "Title,Calendar,Start,End,Event ID\n\
         Standup,Work,2024-01-10 09:00,soon,\n",
    )
    .unwrap();
    let calendar = InMemoryCalendar::default();
    let directory = CalendarDirectory::new(&calendar);

    let mut table = CsvTable::open(&path).unwrap();
    let names = directory.names().await.unwrap();
    let rules = RuleSet::for_mapping(&ColumnMapping::default(), &names, 2);
    rules.apply(&mut table).unwrap();

    assert!(table.rules_path().exists());
    assert_eq!(RuleSet::load(&table.rules_path()).unwrap(), rules);

    let violations = rules.violations(&table, Tz::UTC).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].to_string(), "D2: 'soon' is not a date");
    assert_eq!(table.header_row().unwrap()[0], "Title");
}
