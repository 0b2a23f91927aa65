//! Calendar stores reached through provider binaries.

pub mod protocol;
pub mod provider;

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::DEFAULT_PROVIDER_TIMEOUT_SECS;
use crate::error::{SheetCalError, SheetCalResult};
use crate::remote::protocol::{
    CreateEvent, GetEvent, ListCalendars, ListEvents, SetInterval, SetTitle,
};
pub use crate::remote::provider::Provider;

/// The caller's relationship to a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessRole {
    Owner,
    Writer,
    Reader,
    FreeBusyReader,
}

/// A calendar as listed by the directory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarListing {
    pub id: String,
    pub name: String,
    pub access_role: AccessRole,
}

/// An event as held by the event store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub calendar_id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub recurring: bool,
}

/// Lists calendars the caller can see.
#[allow(async_fn_in_trait)]
pub trait CalendarDirectoryService {
    async fn list_calendars(&self, max_results: u32) -> SheetCalResult<Vec<CalendarListing>>;
}

/// Reads and mutates events.
#[allow(async_fn_in_trait)]
pub trait EventStore {
    async fn create_event(
        &self,
        calendar_id: &str,
        title: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SheetCalResult<CalendarEvent>;

    /// Fails with `SheetCalError::EventNotFound` when the event is gone.
    async fn get_event(&self, event_id: &str) -> SheetCalResult<CalendarEvent>;

    async fn set_title(&self, event_id: &str, title: &str) -> SheetCalResult<()>;

    async fn set_interval(
        &self,
        event_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SheetCalResult<()>;

    async fn list_events(
        &self,
        calendar_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> SheetCalResult<Vec<CalendarEvent>>;
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct RemoteConfig(pub HashMap<String, toml::Value>);

impl From<&RemoteConfig> for serde_json::Map<String, serde_json::Value> {
    fn from(config: &RemoteConfig) -> Self {
        config
            .0
            .iter()
            .filter_map(|(k, v)| serde_json::to_value(v).ok().map(|v| (k.clone(), v)))
            .collect()
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS)
}

/// Provider configuration from the `[remote]` table.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Remote {
    pub provider: Provider,
    #[serde(flatten)]
    pub config: RemoteConfig,
    #[serde(skip, default = "default_timeout")]
    timeout: Duration,
}

impl Remote {
    pub fn new(provider: Provider, config: RemoteConfig) -> Self {
        Remote {
            provider,
            config,
            timeout: default_timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn remote_config(&self) -> serde_json::Map<String, serde_json::Value> {
        serde_json::Map::from(&self.config)
    }
}

impl CalendarDirectoryService for Remote {
    async fn list_calendars(&self, max_results: u32) -> SheetCalResult<Vec<CalendarListing>> {
        self.provider
            .call(
                ListCalendars {
                    remote_config: self.remote_config(),
                    max_results,
                },
                self.timeout,
            )
            .await
    }
}

impl EventStore for Remote {
    async fn create_event(
        &self,
        calendar_id: &str,
        title: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SheetCalResult<CalendarEvent> {
        let event = self
            .provider
            .call(
                CreateEvent {
                    remote_config: self.remote_config(),
                    calendar_id: calendar_id.to_string(),
                    title: title.to_string(),
                    start,
                    end,
                },
                self.timeout,
            )
            .await?;
        info!(event_id = %event.id, calendar_id, "Created event");
        Ok(event)
    }

    async fn get_event(&self, event_id: &str) -> SheetCalResult<CalendarEvent> {
        self.provider
            .call(
                GetEvent {
                    remote_config: self.remote_config(),
                    event_id: event_id.to_string(),
                },
                self.timeout,
            )
            .await
            .map_err(|e| match e {
                SheetCalError::EventNotFound(_) => SheetCalError::EventNotFound(event_id.to_string()),
                other => other,
            })
    }

    async fn set_title(&self, event_id: &str, title: &str) -> SheetCalResult<()> {
        self.provider
            .call(
                SetTitle {
                    remote_config: self.remote_config(),
                    event_id: event_id.to_string(),
                    title: title.to_string(),
                },
                self.timeout,
            )
            .await?;
        info!(event_id, title, "Updated event title");
        Ok(())
    }

    async fn set_interval(
        &self,
        event_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SheetCalResult<()> {
        self.provider
            .call(
                SetInterval {
                    remote_config: self.remote_config(),
                    event_id: event_id.to_string(),
                    start,
                    end,
                },
                self.timeout,
            )
            .await?;
        info!(event_id, %start, %end, "Updated event time");
        Ok(())
    }

    async fn list_events(
        &self,
        calendar_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> SheetCalResult<Vec<CalendarEvent>> {
        self.provider
            .call(
                ListEvents {
                    remote_config: self.remote_config(),
                    calendar_id: calendar_id.to_string(),
                    from,
                    to,
                },
                self.timeout,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_deserializes_flattened_params() {
        let remote: Remote = toml::from_str(
            r#"
provider = "local"
local_path = "/tmp/calendars.json"
"#,
        )
        .unwrap();

        assert_eq!(remote.provider.name(), "local");
        assert_eq!(remote.provider.binary_name(), "sheetcal-provider-local");
        assert_eq!(
            remote.config.0.get("local_path").and_then(|v| v.as_str()),
            Some("/tmp/calendars.json")
        );
        assert_eq!(remote.timeout, default_timeout());
    }

    #[test]
    fn test_remote_config_converts_to_json_params() {
        let remote = Remote::new(
            Provider::from_name("local"),
            RemoteConfig(HashMap::from([(
                "local_path".to_string(),
                toml::Value::String("/tmp/a.json".into()),
            )])),
        );
        let params = remote.remote_config();
        assert_eq!(params["local_path"], "/tmp/a.json");
    }

    #[test]
    fn test_event_recurring_defaults_false() {
        let event: CalendarEvent = serde_json::from_str(
            r#"{"id":"e","calendar_id":"c","title":"t",
                "start":"2024-01-10T09:00:00Z","end":"2024-01-10T09:30:00Z"}"#,
        )
        .unwrap();
        assert!(!event.recurring);
    }
}
