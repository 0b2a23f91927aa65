//! Bringing the event store into agreement with the table.
//!
//! A run reads the header, resolves columns, extracts and filters records,
//! builds a [`ReconcilePlan`] and applies it. Every call is awaited before
//! the next one starts.

pub mod outcome;
pub mod plan;

pub use outcome::{OutcomeCounts, RecordOutcome, RecordReport, RunReport, SkipReason};
pub use plan::{Action, IntervalChange, PlannedRecord, ReconcilePlan, TitleChange};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::column::{ColumnMapping, ColumnResolver, HeaderLabels};
use crate::directory::CalendarDirectory;
use crate::error::SheetCalResult;
use crate::record::{ScheduleRecord, TableLayout, extract_records};
use crate::remote::{CalendarDirectoryService, EventStore};
use crate::table::TabularStore;
use crate::validate::filter_eligible;

pub struct Reconciler {
    resolver: ColumnResolver,
    header_rows: usize,
    timezone: Tz,
}

impl Reconciler {
    pub fn new(
        labels: HeaderLabels,
        defaults: ColumnMapping,
        header_rows: usize,
        timezone: Tz,
    ) -> Self {
        Reconciler {
            resolver: ColumnResolver::new(labels, defaults),
            header_rows,
            timezone,
        }
    }

    /// Resolve the layout from the header row and return the eligible records.
    pub fn load<T: TabularStore>(
        &mut self,
        table: &T,
        now: DateTime<Utc>,
    ) -> SheetCalResult<(TableLayout, Vec<ScheduleRecord>)> {
        let header = table.header_row()?;
        self.resolver.resolve(&header);

        let layout = TableLayout {
            mapping: self.resolver.mapping(),
            header_rows: self.header_rows,
            timezone: self.timezone,
        };

        let records = extract_records(table, &layout)?;
        let total = records.len();
        let eligible = filter_eligible(records, now);
        debug!(total, eligible = eligible.len(), "Extracted records");

        Ok((layout, eligible))
    }

    /// What a run would do, without mutating anything.
    pub async fn plan<T, D, E>(
        &mut self,
        table: &T,
        directory: &CalendarDirectory<'_, D>,
        store: &E,
        now: DateTime<Utc>,
    ) -> SheetCalResult<ReconcilePlan>
    where
        T: TabularStore,
        D: CalendarDirectoryService,
        E: EventStore,
    {
        let (_, records) = self.load(table, now)?;
        ReconcilePlan::build(records, directory, store).await
    }

    /// Run one full reconciliation.
    pub async fn run<T, D, E>(
        &mut self,
        table: &mut T,
        directory: &CalendarDirectory<'_, D>,
        store: &E,
        now: DateTime<Utc>,
    ) -> SheetCalResult<RunReport>
    where
        T: TabularStore,
        D: CalendarDirectoryService,
        E: EventStore,
    {
        let (layout, records) = self.load(table, now)?;
        let plan = ReconcilePlan::build(records, directory, store).await?;
        plan.apply(store, table, layout.mapping.event_id).await
    }
}
