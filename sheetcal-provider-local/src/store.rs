//! Calendars and events kept in one JSON file.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sheetcal_core::remote::{AccessRole, CalendarEvent, CalendarListing};

const DEFAULT_CALENDAR_NAME: &str = "Personal";

/// Returned (wrapped in `anyhow::Error`) when an event id is unknown, so the
/// request loop can answer with a `not_found` code.
#[derive(Debug)]
pub struct EventMissing(pub String);

impl fmt::Display for EventMissing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event not found: {}", self.0)
    }
}

impl std::error::Error for EventMissing {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoreData {
    calendars: Vec<CalendarListing>,
    #[serde(default)]
    events: Vec<CalendarEvent>,
}

impl Default for StoreData {
    fn default() -> Self {
        StoreData {
            calendars: vec![CalendarListing {
                id: uuid::Uuid::new_v4().to_string(),
                name: DEFAULT_CALENDAR_NAME.to_string(),
                access_role: AccessRole::Owner,
            }],
            events: Vec::new(),
        }
    }
}

pub struct LocalStore {
    path: PathBuf,
    data: StoreData,
}

impl LocalStore {
    /// Open the store at `path`. A missing file starts a fresh store with
    /// one owned calendar; it is written on the first change.
    pub async fn open(path: &Path) -> Result<Self> {
        let data = match tokio::fs::read_to_string(path).await {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Could not parse {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let data = StoreData::default();
                save_data(path, &data).await?;
                data
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Could not read {}", path.display()));
            }
        };

        Ok(LocalStore {
            path: path.to_path_buf(),
            data,
        })
    }

    async fn save(&self) -> Result<()> {
        save_data(&self.path, &self.data).await
    }

    pub fn calendars(&self, max_results: u32) -> Vec<CalendarListing> {
        self.data
            .calendars
            .iter()
            .take(max_results as usize)
            .cloned()
            .collect()
    }

    /// Events on `calendar_id` overlapping `from..=to`.
    pub fn events(
        &self,
        calendar_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Vec<CalendarEvent> {
        self.data
            .events
            .iter()
            .filter(|e| e.calendar_id == calendar_id && e.end >= from && e.start <= to)
            .cloned()
            .collect()
    }

    pub fn event(&self, event_id: &str) -> Result<CalendarEvent> {
        self.data
            .events
            .iter()
            .find(|e| e.id == event_id)
            .cloned()
            .ok_or_else(|| EventMissing(event_id.to_string()).into())
    }

    pub async fn create_event(
        &mut self,
        calendar_id: &str,
        title: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<CalendarEvent> {
        if !self.data.calendars.iter().any(|c| c.id == calendar_id) {
            anyhow::bail!("Calendar not found: {calendar_id}");
        }

        let event = CalendarEvent {
            id: uuid::Uuid::new_v4().to_string(),
            calendar_id: calendar_id.to_string(),
            title: title.to_string(),
            start,
            end,
            recurring: false,
        };
        self.data.events.push(event.clone());
        self.save().await?;
        Ok(event)
    }

    pub async fn update_event(
        &mut self,
        event_id: &str,
        change: impl FnOnce(&mut CalendarEvent),
    ) -> Result<()> {
        let event = self
            .data
            .events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| EventMissing(event_id.to_string()))?;
        change(event);
        self.save().await
    }
}

async fn save_data(path: &Path, data: &StoreData) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Could not create {}", parent.display()))?;
    }
    let content = serde_json::to_string_pretty(data)?;
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Could not write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, h, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_missing_file_starts_with_personal_calendar() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("local.json");

        let store = LocalStore::open(&path).await.unwrap();
        let calendars = store.calendars(100);

        assert_eq!(calendars.len(), 1);
        assert_eq!(calendars[0].name, "Personal");
        assert_eq!(calendars[0].access_role, AccessRole::Owner);
        assert!(path.exists());

        let reopened = LocalStore::open(&path).await.unwrap();
        assert_eq!(reopened.calendars(100), calendars);
    }

    #[tokio::test]
    async fn test_created_events_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");
        let mut store = LocalStore::open(&path).await.unwrap();
        let calendar_id = store.calendars(1)[0].id.clone();

        let event = store
            .create_event(&calendar_id, "Standup", at(9), at(10))
            .await
            .unwrap();
        assert!(uuid::Uuid::parse_str(&event.id).is_ok());

        let reopened = LocalStore::open(&path).await.unwrap();
        assert_eq!(reopened.event(&event.id).unwrap(), event);
        assert_eq!(reopened.events(&calendar_id, at(0), at(23)), vec![event]);
        assert!(reopened.events(&calendar_id, at(11), at(12)).is_empty());
    }

    #[tokio::test]
    async fn test_unknown_calendar_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LocalStore::open(&dir.path().join("local.json")).await.unwrap();

        assert!(store.create_event("nope", "Standup", at(9), at(10)).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_event_is_distinguishable() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LocalStore::open(&dir.path().join("local.json")).await.unwrap();

        let err = store.event("evt-404").unwrap_err();
        assert!(err.downcast_ref::<EventMissing>().is_some());

        let err = store
            .update_event("evt-404", |e| e.title = "x".into())
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<EventMissing>().is_some());
    }

    #[tokio::test]
    async fn test_update_event_saves_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");
        let mut store = LocalStore::open(&path).await.unwrap();
        let calendar_id = store.calendars(1)[0].id.clone();
        let event = store
            .create_event(&calendar_id, "Old", at(9), at(10))
            .await
            .unwrap();

        store
            .update_event(&event.id, |e| e.title = "New".into())
            .await
            .unwrap();

        let reopened = LocalStore::open(&path).await.unwrap();
        assert_eq!(reopened.event(&event.id).unwrap().title, "New");
    }
}
