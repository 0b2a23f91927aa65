use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;

use sheetcal_core::directory::CalendarDirectory;
use sheetcal_core::rules::RuleSet;

use super::Context;
use crate::render::Render;

pub async fn run(ctx: &Context) -> Result<()> {
    let mut table = ctx.open_table()?;
    let remote = ctx.remote()?;
    let directory = CalendarDirectory::new(&remote);
    let tz = ctx.timezone()?;

    let (layout, _) = ctx.reconciler()?.load(&table, Utc::now())?;
    let names = directory.names().await?;

    let rules = RuleSet::for_mapping(&layout.mapping, &names, layout.first_data_row());
    rules.apply(&mut table)?;

    println!(
        "Rules written to {}",
        table.rules_path().display().to_string().dimmed()
    );

    let violations = rules.violations(&table, tz)?;
    if violations.is_empty() {
        println!("   {}", "All cells follow the rules".green());
        return Ok(());
    }

    for violation in &violations {
        println!("{}", violation.render());
    }

    Ok(())
}
