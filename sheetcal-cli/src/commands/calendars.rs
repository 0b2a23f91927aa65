use anyhow::Result;
use owo_colors::OwoColorize;

use sheetcal_core::directory::CalendarDirectory;

use super::Context;
use crate::render::Render;
use crate::utils::tui::create_spinner;

pub async fn run(ctx: &Context) -> Result<()> {
    let remote = ctx.remote()?;
    let directory = CalendarDirectory::new(&remote);

    let spinner = create_spinner(format!("Asking {}", remote.provider.name()));
    let result = directory.list().await;
    spinner.finish_and_clear();

    let calendars = result?;
    if calendars.is_empty() {
        println!("{}", "No calendars you own".dimmed());
        return Ok(());
    }

    for calendar in calendars {
        println!("{}", calendar.render());
    }

    Ok(())
}
