//! Global sheetcal configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use config::{Config, File};
use serde::Deserialize;

use crate::column::{ColumnMapping, HeaderLabels};
use crate::constants::{DEFAULT_HEADER_ROWS, DEFAULT_PROVIDER_TIMEOUT_SECS, DEFAULT_TIMEZONE};
use crate::error::{SheetCalError, SheetCalResult};
use crate::remote::Remote;

fn default_header_rows() -> usize {
    DEFAULT_HEADER_ROWS
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_provider_timeout_secs() -> u64 {
    DEFAULT_PROVIDER_TIMEOUT_SECS
}

/// Global configuration at ~/.config/sheetcal/config.toml
#[derive(Debug, Deserialize, Clone)]
pub struct SheetCalConfig {
    /// CSV file holding the schedule.
    pub table: Option<PathBuf>,

    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_header_rows")]
    pub header_rows: usize,

    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,

    /// Fallback columns, used until a header row resolves.
    #[serde(default)]
    pub columns: ColumnMapping,

    #[serde(default)]
    pub headers: HeaderLabels,

    pub remote: Option<Remote>,
}

impl Default for SheetCalConfig {
    fn default() -> Self {
        SheetCalConfig {
            table: None,
            timezone: default_timezone(),
            header_rows: default_header_rows(),
            provider_timeout_secs: default_provider_timeout_secs(),
            columns: ColumnMapping::default(),
            headers: HeaderLabels::default(),
            remote: None,
        }
    }
}

impl SheetCalConfig {
    pub fn config_path() -> SheetCalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SheetCalError::Config("Could not determine config directory".into()))?
            .join("sheetcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config at `path`, or at the default location when `None`.
    /// The default location gets a commented template on first use.
    pub fn load(path: Option<&Path>) -> SheetCalResult<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = Self::config_path()?;
                if !default_path.exists() {
                    Self::create_default_config(&default_path)?;
                }
                default_path
            }
        };

        let config: SheetCalConfig = Config::builder()
            .add_source(File::from(config_path).required(false))
            .build()
            .map_err(|e| SheetCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| SheetCalError::Config(e.to_string()))?;

        if let Some((a, b)) = config.columns.shared_column() {
            return Err(SheetCalError::Config(format!(
                "[columns] puts {} and {} both in column {}",
                a.name(),
                b.name(),
                config.columns.get(a)
            )));
        }

        Ok(config)
    }

    /// The table path with `~` expanded.
    pub fn table_path(&self) -> Option<PathBuf> {
        self.table
            .as_ref()
            .map(|p| PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).into_owned()))
    }

    pub fn tz(&self) -> SheetCalResult<Tz> {
        self.timezone
            .parse()
            .map_err(|_| SheetCalError::Config(format!("Unknown timezone '{}'", self.timezone)))
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    /// The configured remote with the configured timeout applied.
    pub fn remote(&self) -> SheetCalResult<Remote> {
        let remote = self.remote.clone().ok_or_else(|| {
            SheetCalError::Config("No [remote] section in config. Add one with a provider".into())
        })?;
        Ok(remote.with_timeout(self.provider_timeout()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> SheetCalResult<()> {
        let contents = format!(
            "\
# sheetcal configuration

# CSV file holding your schedule:
# table = \"~/schedule.csv\"

# Timezone for dates written without an offset:
# timezone = \"{DEFAULT_TIMEZONE}\"

# Rows at the top of the table that hold labels:
# header_rows = {DEFAULT_HEADER_ROWS}

# Seconds to wait for each provider call:
# provider_timeout_secs = {DEFAULT_PROVIDER_TIMEOUT_SECS}

# Columns to use when the header row doesn't name them all:
# [columns]
# title = \"A\"
# calendar = \"B\"
# start = \"C\"
# end = \"D\"
# event_id = \"E\"

# Header labels that locate each column:
# [headers]
# title = \"Title\"
# calendar = \"Calendar\"
# start = \"Start\"
# end = \"End\"
# event_id = \"Event ID\"

# Where events live:
# [remote]
# provider = \"local\"
# local_path = \"~/.local/share/sheetcal/local.json\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SheetCalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| SheetCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
