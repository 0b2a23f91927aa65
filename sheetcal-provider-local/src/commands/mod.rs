pub mod create_event;
pub mod get_event;
pub mod list_calendars;
pub mod list_events;
pub mod set_interval;
pub mod set_title;

use anyhow::Result;

use crate::remote_config::LocalRemoteConfig;
use crate::store::LocalStore;

/// Open the store named by the request's remote params.
pub async fn open_store(
    remote_config: &serde_json::Map<String, serde_json::Value>,
) -> Result<LocalStore> {
    let config = LocalRemoteConfig::try_from(remote_config)?;
    LocalStore::open(&config.local_path).await
}
