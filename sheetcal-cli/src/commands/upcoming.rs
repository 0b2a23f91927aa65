use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;

use sheetcal_core::directory::CalendarDirectory;
use sheetcal_core::upcoming::{DateRange, upcoming_events};

use super::Context;
use crate::render::render_upcoming;
use crate::utils::tui::create_spinner;

pub async fn run(ctx: &Context, from: Option<&str>, to: Option<&str>) -> Result<()> {
    let tz = ctx.timezone()?;
    let range = DateRange::from_args(from, to, Utc::now(), tz)?;
    let remote = ctx.remote()?;
    let directory = CalendarDirectory::new(&remote);

    let spinner = create_spinner("Loading events".to_string());
    let result = upcoming_events(&directory, &remote, range).await;
    spinner.finish_and_clear();

    let events = result?;
    if events.is_empty() {
        println!("{}", "No upcoming events".dimmed());
        return Ok(());
    }

    for event in &events {
        println!("{}", render_upcoming(event, tz));
    }

    Ok(())
}
