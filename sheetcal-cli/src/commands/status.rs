use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;

use sheetcal_core::directory::CalendarDirectory;

use super::Context;
use crate::render::render_plan;
use crate::utils::tui::create_spinner;

pub async fn run(ctx: &Context) -> Result<()> {
    let table = ctx.open_table()?;
    let remote = ctx.remote()?;
    let directory = CalendarDirectory::new(&remote);
    let mut reconciler = ctx.reconciler()?;
    let tz = ctx.timezone()?;

    let header = format!("📄 {}", table.path().display());
    let spinner = create_spinner(header.clone());
    let result = reconciler
        .plan(&table, &directory, &remote, Utc::now())
        .await;
    spinner.finish_and_clear();

    println!("{}", header.bold());
    match result {
        Ok(plan) => {
            println!("{}", render_plan(&plan, tz));
            Ok(())
        }
        Err(e) => {
            println!("   {}", e.to_string().red());
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_planning_error_fails_the_command() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "[remote]\nprovider = \"missing-for-status-test\"\n",
        )
        .unwrap();
        let table_path = dir.path().join("schedule.csv");
        std::fs::write(
            &table_path,
            "Title,Calendar,Start,End,Event ID\nStandup,Work,2099-01-10 09:00,2099-01-10 09:30,\n",
        )
        .unwrap();

        let ctx = Context::load(Some(&config_path), Some(table_path)).unwrap();

        assert!(run(&ctx).await.is_err());
    }
}
