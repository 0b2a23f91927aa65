mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::Context;

#[derive(Parser)]
#[command(name = "sheetcal")]
#[command(about = "Keep calendar events in line with a schedule table")]
struct Cli {
    /// Config file to use instead of ~/.config/sheetcal/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Schedule table (CSV), overriding `table` from the config
    #[arg(long, global = true)]
    table: Option<PathBuf>,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create and update events so the calendar matches the table
    Run {
        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show what `run` would do, without changing anything
    Status,
    /// List the calendars rows can refer to
    Calendars,
    /// Install input rules on the table and list cells that break them
    Rules,
    /// List upcoming events on your calendars
    Upcoming {
        /// Show events from this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Show events until this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = Context::load(cli.config.as_deref(), cli.table)?;

    match cli.command {
        Commands::Run { json } => commands::run::run(&ctx, json).await,
        Commands::Status => commands::status::run(&ctx).await,
        Commands::Calendars => commands::calendars::run(&ctx).await,
        Commands::Rules => commands::rules::run(&ctx).await,
        Commands::Upcoming { from, to } => {
            commands::upcoming::run(&ctx, from.as_deref(), to.as_deref()).await
        }
    }
}
