use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;

use sheetcal_core::directory::CalendarDirectory;

use super::Context;
use crate::render::{Render, render_counts};
use crate::utils::tui::create_spinner;

pub async fn run(ctx: &Context, json: bool) -> Result<()> {
    let mut table = ctx.open_table()?;
    let remote = ctx.remote()?;
    let directory = CalendarDirectory::new(&remote);
    let mut reconciler = ctx.reconciler()?;

    let spinner = (!json).then(|| create_spinner(format!("Reconciling {}", table.path().display())));
    let result = reconciler
        .run(&mut table, &directory, &remote, Utc::now())
        .await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let report = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", format!("📄 {}", table.path().display()).bold());
        for record in &report.records {
            println!("   {}", record.render());
        }
        println!("\n{}", render_counts(&report.counts()));
    }

    if report.has_failures() {
        anyhow::bail!("Some rows could not be reconciled");
    }

    Ok(())
}
