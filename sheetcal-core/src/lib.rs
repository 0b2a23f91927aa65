//! Core types for sheetcal.
//!
//! Keeps calendar events in line with a table of schedule rows:
//! - `table` and `record` read rows into typed records
//! - `directory` and `remote` reach the calendar store through a provider
//! - `reconcile` plans and applies the changes for one run

pub mod column;
pub mod config;
pub mod constants;
pub mod directory;
pub mod error;
pub mod reconcile;
pub mod record;
pub mod remote;
pub mod rules;
pub mod table;
pub mod time;
pub mod upcoming;
pub mod validate;

#[cfg(test)]
mod test_support;

pub use error::{SheetCalError, SheetCalResult};
