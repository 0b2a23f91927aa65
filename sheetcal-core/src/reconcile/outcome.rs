use std::fmt;

use serde::Serialize;

/// Why a record was left alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "calendar", rename_all = "snake_case")]
pub enum SkipReason {
    CalendarNotFound(String),
    AmbiguousCalendar(String),
    /// Start or end missing. Only reachable when unvalidated records are planned.
    Incomplete,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::CalendarNotFound(name) => write!(f, "no owned calendar named '{name}'"),
            SkipReason::AmbiguousCalendar(name) => {
                write!(f, "more than one owned calendar named '{name}'")
            }
            SkipReason::Incomplete => write!(f, "start or end missing"),
        }
    }
}

/// Terminal state of one record after a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecordOutcome {
    Created {
        event_id: String,
    },
    Updated {
        event_id: String,
        title_changed: bool,
        interval_changed: bool,
    },
    Unchanged {
        event_id: String,
    },
    Skipped {
        reason: SkipReason,
    },
    Failed {
        reason: String,
    },
}

impl RecordOutcome {
    pub fn symbol(&self) -> &'static str {
        match self {
            RecordOutcome::Created { .. } => "+",
            RecordOutcome::Updated { .. } => "~",
            RecordOutcome::Unchanged { .. } => "=",
            RecordOutcome::Skipped { .. } => "?",
            RecordOutcome::Failed { .. } => "!",
        }
    }
}

impl fmt::Display for RecordOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordOutcome::Created { event_id } => write!(f, "created {event_id}"),
            RecordOutcome::Updated {
                event_id,
                title_changed,
                interval_changed,
            } => {
                let what = match (title_changed, interval_changed) {
                    (true, true) => "title and time",
                    (true, false) => "title",
                    _ => "time",
                };
                write!(f, "updated {what} of {event_id}")
            }
            RecordOutcome::Unchanged { event_id } => write!(f, "{event_id} up to date"),
            RecordOutcome::Skipped { reason } => write!(f, "skipped: {reason}"),
            RecordOutcome::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordReport {
    pub row: usize,
    pub title: String,
    #[serde(flatten)]
    pub outcome: RecordOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Every record's outcome for one run, in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub records: Vec<RecordReport>,
}

impl RunReport {
    pub fn counts(&self) -> OutcomeCounts {
        let mut counts = OutcomeCounts::default();
        for report in &self.records {
            match report.outcome {
                RecordOutcome::Created { .. } => counts.created += 1,
                RecordOutcome::Updated { .. } => counts.updated += 1,
                RecordOutcome::Unchanged { .. } => counts.unchanged += 1,
                RecordOutcome::Skipped { .. } => counts.skipped += 1,
                RecordOutcome::Failed { .. } => counts.failed += 1,
            }
        }
        counts
    }

    pub fn has_failures(&self) -> bool {
        self.counts().failed > 0
    }

    pub fn outcome_for_row(&self, row: usize) -> Option<&RecordOutcome> {
        self.records
            .iter()
            .find(|r| r.row == row)
            .map(|r| &r.outcome)
    }
}
