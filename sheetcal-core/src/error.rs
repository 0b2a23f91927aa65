//! Error types for sheetcal.

use thiserror::Error;

/// Errors that can occur in sheetcal operations.
#[derive(Error, Debug)]
pub enum SheetCalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Table error: {0}")]
    Table(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid column reference '{0}'")]
    InvalidColumn(String),

    #[error("Calendar not found: {0}")]
    CalendarNotFound(String),

    #[error("Calendar name '{0}' matches more than one owned calendar")]
    AmbiguousCalendar(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider '{0}' not found in PATH")]
    ProviderNotInstalled(String),

    #[error("Provider request timed out after {0}s")]
    ProviderTimeout(u64),

    #[error("Created event {event_id} but could not record it in row {row}: {reason}")]
    WriteBack {
        row: usize,
        event_id: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for sheetcal operations.
pub type SheetCalResult<T> = Result<T, SheetCalError>;
