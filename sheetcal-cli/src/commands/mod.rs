pub mod calendars;
pub mod rules;
pub mod run;
pub mod status;
pub mod upcoming;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use chrono_tz::Tz;
use sheetcal_core::config::SheetCalConfig;
use sheetcal_core::reconcile::Reconciler;
use sheetcal_core::remote::Remote;
use sheetcal_core::table::CsvTable;
use tracing::debug;

/// Settings shared by every command.
pub struct Context {
    config: SheetCalConfig,
    table_override: Option<PathBuf>,
}

impl Context {
    pub fn load(config_path: Option<&Path>, table_override: Option<PathBuf>) -> Result<Self> {
        let config = SheetCalConfig::load(config_path)?;
        debug!(?config_path, timezone = %config.timezone, "Loaded config");
        Ok(Context {
            config,
            table_override,
        })
    }

    pub fn table_path(&self) -> Result<PathBuf> {
        match self.table_override.clone().or_else(|| self.config.table_path()) {
            Some(path) => Ok(path),
            None => anyhow::bail!(
                "No schedule table configured.\n\n\
                Point sheetcal at a CSV file with:\n  \
                sheetcal --table <path> <command>\n\n\
                or set `table` in {}",
                SheetCalConfig::config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|_| "the config file".into())
            ),
        }
    }

    pub fn open_table(&self) -> Result<CsvTable> {
        let path = self.table_path()?;
        CsvTable::open(&path).with_context(|| format!("Could not open {}", path.display()))
    }

    pub fn remote(&self) -> Result<Remote> {
        Ok(self.config.remote()?)
    }

    pub fn timezone(&self) -> Result<Tz> {
        Ok(self.config.tz()?)
    }

    pub fn reconciler(&self) -> Result<Reconciler> {
        Ok(Reconciler::new(
            self.config.headers.clone(),
            self.config.columns,
            self.config.header_rows,
            self.timezone()?,
        ))
    }
}
