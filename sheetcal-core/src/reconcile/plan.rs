use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::column::Column;
use crate::directory::CalendarDirectory;
use crate::error::{SheetCalError, SheetCalResult};
use crate::reconcile::outcome::{RecordOutcome, RecordReport, RunReport, SkipReason};
use crate::record::ScheduleRecord;
use crate::remote::{CalendarDirectoryService, CalendarEvent, EventStore};
use crate::table::TabularStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleChange {
    pub old: String,
    pub new: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntervalChange {
    pub old_start: DateTime<Utc>,
    pub old_end: DateTime<Utc>,
    pub new_start: DateTime<Utc>,
    pub new_end: DateTime<Utc>,
}

/// What applying the plan will do with one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Create {
        calendar_id: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    Update {
        event_id: String,
        title: Option<TitleChange>,
        interval: Option<IntervalChange>,
    },
    Unchanged {
        event_id: String,
    },
    Skip {
        reason: SkipReason,
    },
    Fail {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedRecord {
    pub record: ScheduleRecord,
    pub action: Action,
}

/// Per-record decisions for one run, computed without mutating anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconcilePlan {
    pub records: Vec<PlannedRecord>,
}

/// Equal at the store's granularity: whole seconds.
fn same_instant(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.timestamp() == b.timestamp()
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.records
            .iter()
            .all(|p| matches!(p.action, Action::Unchanged { .. }))
    }

    /// Decide what to do with each record.
    ///
    /// Unregistered records resolve their calendar; registered ones fetch
    /// their event and compare. Lookup problems land in the plan as `Skip`
    /// or `Fail`; only a failing directory listing aborts.
    pub async fn build<D, E>(
        records: Vec<ScheduleRecord>,
        directory: &CalendarDirectory<'_, D>,
        store: &E,
    ) -> SheetCalResult<Self>
    where
        D: CalendarDirectoryService,
        E: EventStore,
    {
        let mut planned = Vec::with_capacity(records.len());

        for record in records {
            let action = match (record.start, record.end) {
                (Some(start), Some(end)) => match record.event_id.as_deref() {
                    Some(event_id) if !event_id.is_empty() => {
                        plan_registered(&record, event_id, start, end, store).await
                    }
                    _ => plan_unregistered(&record, start, end, directory).await?,
                },
                _ => Action::Skip {
                    reason: SkipReason::Incomplete,
                },
            };
            planned.push(PlannedRecord { record, action });
        }

        Ok(ReconcilePlan { records: planned })
    }

    /// Carry out the plan, one record at a time.
    ///
    /// A new event's id is written to `event_id_column` right after the
    /// event is created. Failing that write aborts the run, since the next
    /// run would create the event again.
    pub async fn apply<E, T>(
        self,
        store: &E,
        table: &mut T,
        event_id_column: Column,
    ) -> SheetCalResult<RunReport>
    where
        E: EventStore,
        T: TabularStore,
    {
        let mut report = RunReport::default();

        for PlannedRecord { record, action } in self.records {
            let outcome = match action {
                Action::Create {
                    calendar_id,
                    start,
                    end,
                } => match store
                    .create_event(&calendar_id, &record.title, start, end)
                    .await
                {
                    Ok(event) => {
                        table
                            .write_cell(record.row, event_id_column, &event.id)
                            .map_err(|e| SheetCalError::WriteBack {
                                row: record.row,
                                event_id: event.id.clone(),
                                reason: e.to_string(),
                            })?;
                        info!(row = record.row, event_id = %event.id, "Recorded new event id");
                        RecordOutcome::Created { event_id: event.id }
                    }
                    Err(e) => {
                        warn!(row = record.row, error = %e, "Could not create event");
                        RecordOutcome::Failed {
                            reason: e.to_string(),
                        }
                    }
                },
                Action::Update {
                    event_id,
                    title,
                    interval,
                } => match apply_update(store, &event_id, title.as_ref(), interval.as_ref()).await {
                    Ok(()) => RecordOutcome::Updated {
                        event_id,
                        title_changed: title.is_some(),
                        interval_changed: interval.is_some(),
                    },
                    Err(e) => {
                        warn!(row = record.row, %event_id, error = %e, "Could not update event");
                        RecordOutcome::Failed {
                            reason: e.to_string(),
                        }
                    }
                },
                Action::Unchanged { event_id } => RecordOutcome::Unchanged { event_id },
                Action::Skip { reason } => RecordOutcome::Skipped { reason },
                Action::Fail { reason } => RecordOutcome::Failed { reason },
            };

            report.records.push(RecordReport {
                row: record.row,
                title: record.title,
                outcome,
            });
        }

        Ok(report)
    }
}

async fn plan_unregistered<D: CalendarDirectoryService>(
    record: &ScheduleRecord,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    directory: &CalendarDirectory<'_, D>,
) -> SheetCalResult<Action> {
    let reason = match directory.resolve_id(&record.calendar_name).await {
        Ok(calendar_id) => {
            return Ok(Action::Create {
                calendar_id: calendar_id.to_string(),
                start,
                end,
            });
        }
        Err(SheetCalError::CalendarNotFound(name)) => SkipReason::CalendarNotFound(name),
        Err(SheetCalError::AmbiguousCalendar(name)) => SkipReason::AmbiguousCalendar(name),
        Err(e) => return Err(e),
    };

    warn!(row = record.row, %reason, "Skipping row");
    Ok(Action::Skip { reason })
}

async fn plan_registered<E: EventStore>(
    record: &ScheduleRecord,
    event_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    store: &E,
) -> Action {
    let event = match store.get_event(event_id).await {
        Ok(event) => event,
        Err(e) => {
            warn!(row = record.row, event_id, error = %e, "Could not fetch linked event");
            return Action::Fail {
                reason: e.to_string(),
            };
        }
    };

    diff_event(&event, &record.title, start, end)
}

/// Compare a stored event against the row. Start and end always travel
/// together: if either differs, both are rewritten.
fn diff_event(event: &CalendarEvent, title: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Action {
    let title_change = (event.title != title).then(|| TitleChange {
        old: event.title.clone(),
        new: title.to_string(),
    });

    let interval_change = (!same_instant(event.start, start) || !same_instant(event.end, end))
        .then(|| IntervalChange {
            old_start: event.start,
            old_end: event.end,
            new_start: start,
            new_end: end,
        });

    if title_change.is_none() && interval_change.is_none() {
        Action::Unchanged {
            event_id: event.id.clone(),
        }
    } else {
        Action::Update {
            event_id: event.id.clone(),
            title: title_change,
            interval: interval_change,
        }
    }
}

async fn apply_update<E: EventStore>(
    store: &E,
    event_id: &str,
    title: Option<&TitleChange>,
    interval: Option<&IntervalChange>,
) -> SheetCalResult<()> {
    if let Some(change) = title {
        store.set_title(event_id, &change.new).await?;
    }
    if let Some(change) = interval {
        store
            .set_interval(event_id, change.new_start, change.new_end)
            .await?;
    }
    Ok(())
}
