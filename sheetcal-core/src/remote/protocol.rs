//! Defines the JSON protocol used between sheetcal and provider binaries
//! over stdin/stdout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::remote::{CalendarEvent, CalendarListing};

pub trait ProviderCommand: Serialize {
    type Response: DeserializeOwned;
    fn command() -> Command;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    ListCalendars,
    ListEvents,
    CreateEvent,
    GetEvent,
    SetTitle,
    SetInterval,
}

/// Request sent from sheetcal to a provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Machine-readable failure reasons a provider can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
}

/// Response sent from a provider back to sheetcal.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success {
        data: T,
    },
    Error {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<ErrorCode>,
    },
}

impl<T: Serialize> Response<T> {
    pub fn success(data: T) -> String {
        match serde_json::to_string(&Response::Success { data }) {
            Ok(line) => line,
            Err(e) => Response::<()>::error(&format!("Failed to serialize response: {e}")),
        }
    }
}

impl Response<()> {
    pub fn error(msg: &str) -> String {
        serde_json::json!({ "status": "error", "error": msg }).to_string()
    }

    pub fn not_found(msg: &str) -> String {
        serde_json::json!({ "status": "error", "error": msg, "code": ErrorCode::NotFound })
            .to_string()
    }
}

/// List calendars visible to the configured account. One page only.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListCalendars {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub max_results: u32,
}

impl ProviderCommand for ListCalendars {
    type Response = Vec<CalendarListing>;
    fn command() -> Command {
        Command::ListCalendars
    }
}

/// List events of one calendar within a time range.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListEvents {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub calendar_id: String,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl ProviderCommand for ListEvents {
    type Response = Vec<CalendarEvent>;
    fn command() -> Command {
        Command::ListEvents
    }
}

/// Create an event. The provider assigns the id.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateEvent {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub calendar_id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ProviderCommand for CreateEvent {
    type Response = CalendarEvent;
    fn command() -> Command {
        Command::CreateEvent
    }
}

/// Fetch one event by id. Providers answer `not_found` when it is gone.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetEvent {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub event_id: String,
}

impl ProviderCommand for GetEvent {
    type Response = CalendarEvent;
    fn command() -> Command {
        Command::GetEvent
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetTitle {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub event_id: String,
    pub title: String,
}

impl ProviderCommand for SetTitle {
    type Response = ();
    fn command() -> Command {
        Command::SetTitle
    }
}

/// Replace both ends of an event's interval at once.
#[derive(Debug, Serialize, Deserialize)]
pub struct SetInterval {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub event_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ProviderCommand for SetInterval {
    type Response = ();
    fn command() -> Command {
        Command::SetInterval
    }
}
