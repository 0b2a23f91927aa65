//! TUI rendering for sheetcal types.
//!
//! Extension traits that add colored terminal rendering to sheetcal-core
//! types using owo_colors.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use owo_colors::OwoColorize;
use sheetcal_core::directory::CalendarEntry;
use sheetcal_core::reconcile::{
    Action, OutcomeCounts, PlannedRecord, RecordOutcome, RecordReport, ReconcilePlan,
};
use sheetcal_core::rules::Violation;
use sheetcal_core::time::format_local;
use sheetcal_core::upcoming::UpcomingEvent;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// Colorize text according to the outcome
fn colorize_outcome(outcome: &RecordOutcome, text: &str) -> String {
    match outcome {
        RecordOutcome::Created { .. } => text.green().to_string(),
        RecordOutcome::Updated { .. } => text.yellow().to_string(),
        RecordOutcome::Unchanged { .. } => text.dimmed().to_string(),
        RecordOutcome::Skipped { .. } => text.yellow().to_string(),
        RecordOutcome::Failed { .. } => text.red().to_string(),
    }
}

impl Render for RecordOutcome {
    fn render(&self) -> String {
        colorize_outcome(self, self.symbol())
    }
}

impl Render for RecordReport {
    fn render(&self) -> String {
        let label = format!("Row {}", self.row);
        format!(
            "{} {} {} {}",
            self.outcome.render(),
            label.dimmed(),
            colorize_outcome(&self.outcome, &self.title),
            self.outcome.to_string().dimmed()
        )
    }
}

impl Render for CalendarEntry {
    fn render(&self) -> String {
        format!("📅 {} {}", self.name, self.id.dimmed())
    }
}

impl Render for Violation {
    fn render(&self) -> String {
        format!("   {} {}", "!".red(), self)
    }
}

fn render_interval(start: &DateTime<Utc>, end: &DateTime<Utc>, tz: Tz) -> String {
    format!("{} → {}", format_local(start, tz), format_local(end, tz))
}

fn render_planned(planned: &PlannedRecord, tz: Tz) -> Vec<String> {
    let record = &planned.record;
    let label = format!("Row {}", record.row).dimmed().to_string();

    match &planned.action {
        Action::Create { start, end, .. } => vec![format!(
            "   {} {} {} {}",
            "+".green(),
            label,
            record.title.green(),
            format!("{} · {}", record.calendar_name, render_interval(start, end, tz)).dimmed()
        )],
        Action::Update {
            title, interval, ..
        } => {
            let mut lines = vec![format!(
                "   {} {} {}",
                "~".yellow(),
                label,
                record.title.yellow()
            )];
            if let Some(change) = title {
                lines.push(format!(
                    "      {} {} → {}",
                    "title:".dimmed(),
                    change.old.red(),
                    change.new.green()
                ));
            }
            if let Some(change) = interval {
                lines.push(format!(
                    "      {} {} → {}",
                    "time:".dimmed(),
                    render_interval(&change.old_start, &change.old_end, tz).red(),
                    render_interval(&change.new_start, &change.new_end, tz).green()
                ));
            }
            lines
        }
        Action::Unchanged { .. } => Vec::new(),
        Action::Skip { reason } => vec![format!(
            "   {} {} {} {}",
            "?".yellow(),
            label,
            record.title,
            reason.to_string().dimmed()
        )],
        Action::Fail { reason } => vec![format!(
            "   {} {} {} {}",
            "!".red(),
            label,
            record.title,
            reason.red()
        )],
    }
}

pub fn render_plan(plan: &ReconcilePlan, tz: Tz) -> String {
    if plan.is_empty() {
        return "   No changes".dimmed().to_string();
    }

    plan.records
        .iter()
        .flat_map(|planned| render_planned(planned, tz))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_upcoming(upcoming: &UpcomingEvent, tz: Tz) -> String {
    format!(
        "   {} {} {}",
        format_local(&upcoming.event.start, tz).dimmed(),
        upcoming.event.title,
        format!("({})", upcoming.calendar).dimmed()
    )
}

/// Simple pluralization helper
fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

pub fn render_counts(counts: &OutcomeCounts) -> String {
    let mut parts = Vec::new();
    if counts.created > 0 {
        parts.push(format!("{} created", counts.created).green().to_string());
    }
    if counts.updated > 0 {
        parts.push(format!("{} updated", counts.updated).yellow().to_string());
    }
    if counts.unchanged > 0 {
        parts.push(format!("{} unchanged", counts.unchanged).dimmed().to_string());
    }
    if counts.skipped > 0 {
        parts.push(format!("{} skipped", counts.skipped).yellow().to_string());
    }
    if counts.failed > 0 {
        parts.push(format!("{} failed", counts.failed).red().to_string());
    }

    let total = counts.created + counts.updated + counts.unchanged + counts.skipped + counts.failed;
    if parts.is_empty() {
        return "No rows to reconcile".dimmed().to_string();
    }
    format!("{} {}: {}", total, pluralize("row", total), parts.join(", "))
}
